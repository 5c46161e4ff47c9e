// src/store/mod.rs

//! Read access to the external listing store.
//!
//! The store owns the records; this crate only reads them. "Not found" and
//! "empty collection" are valid non-error outcomes everywhere.

pub mod firebase;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ListingRecord;

// Re-export for convenience
pub use firebase::FirebaseStore;

/// Trait for listing store backends.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Fetch one record by its id. `Ok(None)` when no record exists.
    async fn get_listing(&self, id: &str) -> Result<Option<ListingRecord>>;

    /// Fetch all records under the collection. `Ok(vec![])` when empty.
    async fn list_listings(&self) -> Result<Vec<ListingRecord>>;
}

/// In-memory store used by tests and CLI fixtures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ListingRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn get_listing(&self, id: &str) -> Result<Option<ListingRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_listings(&self) -> Result<Vec<ListingRecord>> {
        Ok(self.records.clone())
    }
}
