// src/seo/mod.rs

//! SEO core: slugs, canonical URLs, structured data and head metadata.

pub mod meta;
pub mod schema;
pub mod slug;
pub mod url;
