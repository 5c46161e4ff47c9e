// src/models/mod.rs

//! Domain models for the listing SEO application.

mod listing;

// Re-export all public types
pub use listing::{ListingRecord, ListingStatus};
