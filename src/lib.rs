// src/lib.rs

//! SEO core for a Turkish job-listing site.
//!
//! Slug generation, identity-stable listing URLs, JSON-LD structured data,
//! head metadata planning, sitemap generation and search-engine pings.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod page;
pub mod seo;
pub mod sitemap;
pub mod store;

#[cfg(feature = "lambda")]
pub mod handler;
