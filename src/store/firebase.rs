// src/store/firebase.rs

//! Realtime-database REST backend.
//!
//! Records live under one collection path; the REST API returns the whole
//! collection as a JSON object keyed by record id, or `null` when nothing
//! exists. The key is injected into each record as its `id`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::store::ListingStore;

/// REST client for the hosted realtime database (read-only).
pub struct FirebaseStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

impl FirebaseStore {
    /// Create a store client from configuration.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.database_url.trim_end_matches('/').to_string(),
            collection: config.collection.trim_matches('/').to_string(),
        })
    }

    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}/{}.json", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::store(format!("read failed for {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::store(format!(
                "store returned {} for {url}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::store(format!("invalid JSON from {url}: {e}")))
    }
}

#[async_trait]
impl ListingStore for FirebaseStore {
    async fn get_listing(&self, id: &str) -> Result<Option<ListingRecord>> {
        let value = self.fetch_json(&format!("{}/{}", self.collection, id)).await?;

        if value.is_null() {
            return Ok(None);
        }

        let mut record: ListingRecord = serde_json::from_value(value)
            .map_err(|e| AppError::store(format!("malformed record {id}: {e}")))?;
        record.id = id.to_string();
        Ok(Some(record))
    }

    async fn list_listings(&self) -> Result<Vec<ListingRecord>> {
        let value = self.fetch_json(&self.collection).await?;

        if value.is_null() {
            log::warn!("No listings found under '{}'", self.collection);
            return Ok(Vec::new());
        }

        // BTreeMap keeps key order stable across reads.
        let entries: BTreeMap<String, Value> = serde_json::from_value(value)
            .map_err(|e| AppError::store(format!("unexpected collection shape: {e}")))?;

        let mut records = Vec::with_capacity(entries.len());
        let mut malformed = 0usize;

        // One malformed record must not abort the read of the rest.
        for (id, raw) in entries {
            match serde_json::from_value::<ListingRecord>(raw) {
                Ok(mut record) => {
                    record.id = id;
                    records.push(record);
                }
                Err(e) => {
                    malformed += 1;
                    log::warn!("Skipping malformed record {}: {}", id, e);
                }
            }
        }

        if malformed > 0 {
            log::warn!("{} malformed records skipped during listing read", malformed);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirebaseStore {
        FirebaseStore::new(&StoreConfig {
            database_url: "https://db.example.com/".into(),
            collection: "/jobs/".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn new_normalizes_paths() {
        let store = store();
        assert_eq!(store.base_url, "https://db.example.com");
        assert_eq!(store.collection, "jobs");
    }

    #[test]
    fn collection_parse_injects_ids_and_skips_malformed() {
        // Mirror of list_listings' per-entry handling on a raw payload.
        let payload: BTreeMap<String, Value> = serde_json::from_str(
            r#"{
                "-Na1": {"title": "Garson", "company": "Acme"},
                "-Nb2": {"title": 42},
                "-Nc3": {"title": "Kurye", "createdAt": 1700000000000}
            }"#,
        )
        .unwrap();

        let mut records = Vec::new();
        for (id, raw) in payload {
            if let Ok(mut record) = serde_json::from_value::<ListingRecord>(raw) {
                record.id = id;
                records.push(record);
            }
        }

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "-Na1");
        assert_eq!(records[1].id, "-Nc3");
        assert_eq!(records[1].created_at, Some(1_700_000_000_000));
    }
}
