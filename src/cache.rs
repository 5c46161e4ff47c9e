// src/cache.rs

//! Time-bounded cache for individual listing reads.
//!
//! An explicitly constructed, explicitly scoped object with an injected
//! expiry policy: created once per session, read and written only through
//! this interface. Entries expire by elapsed time; there is no explicit
//! invalidation, and a miss always falls back to a fresh store read.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::ListingRecord;

/// TTL cache keyed by listing id.
#[derive(Debug)]
pub struct ListingCache {
    ttl: Duration,
    entries: HashMap<String, (ListingRecord, Instant)>,
}

impl ListingCache {
    /// Create a cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up a listing; expired entries count as misses.
    pub fn get(&self, id: &str) -> Option<&ListingRecord> {
        self.entries.get(id).and_then(|(record, inserted)| {
            if inserted.elapsed() < self.ttl {
                Some(record)
            } else {
                None
            }
        })
    }

    /// Store a freshly read listing.
    pub fn insert(&mut self, record: ListingRecord) {
        self.entries
            .insert(record.id.clone(), (record, Instant::now()));
    }

    /// Drop expired entries. Optional housekeeping; lookups already treat
    /// expired entries as absent.
    pub fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, inserted)| inserted.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
