//! Listing record structure.

use serde::{Deserialize, Serialize};

/// Publication status of a listing.
///
/// The store writes `active`/`inactive`; a missing field means the record
/// predates the status column and is treated as active. Two legacy aliases
/// (`approved`, `published`) still exist on old records and remain viewable
/// on the details page, but only `active`/absent records are publicly
/// listed in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Inactive,
    Approved,
    Published,
    #[serde(other)]
    Unknown,
}

/// A single job posting record, owned by the external store.
///
/// Every field except `id` is deserialized defensively: records written by
/// older versions of the submission flow miss fields freely, and a missing
/// field must never fail a read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingRecord {
    /// Opaque unique key assigned by the store at creation. Injected from
    /// the collection key when reading, so it may be absent in the raw JSON.
    pub id: String,

    /// Listing title; source of the URL slug
    pub title: String,

    /// Company display name
    pub company: String,

    /// Free-text location, e.g. "İzmir, Konak"
    pub location: String,

    /// Category id, e.g. "hizmet"
    pub category: String,

    /// Sub-category id
    pub sub_category: String,

    /// Employment type in the site's vocabulary, e.g. "Tam Zamanlı"
    #[serde(rename = "type")]
    pub employment_type: String,

    /// Free-text salary, possibly empty or "Belirtilmemiş"
    pub salary: String,

    /// Listing body, may contain HTML fragments
    pub description: String,

    /// Creation instant as epoch milliseconds
    pub created_at: Option<i64>,

    /// Last-modification instant as epoch milliseconds
    pub updated_at: Option<i64>,

    /// Publication status; absent means active
    pub status: Option<ListingStatus>,

    // Extended fields, consumed opportunistically when present.
    pub company_logo: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub education_level: Option<String>,
    pub experience_level: Option<String>,
    pub benefits: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub remote: Option<bool>,
    pub industry: Option<String>,
    pub urgent: Option<bool>,
}

impl ListingRecord {
    /// Whether the record belongs in public listings (sitemap, search).
    pub fn is_publicly_listed(&self) -> bool {
        matches!(self.status, Some(ListingStatus::Active) | None)
    }

    /// Whether the record may be rendered on its details page.
    ///
    /// Wider than [`is_publicly_listed`](Self::is_publicly_listed): legacy
    /// status aliases stay reachable through a direct link.
    pub fn is_viewable(&self) -> bool {
        matches!(
            self.status,
            Some(ListingStatus::Active)
                | Some(ListingStatus::Approved)
                | Some(ListingStatus::Published)
                | None
        )
    }

    /// Most recent activity instant: `updatedAt` falling back to `createdAt`.
    pub fn last_activity_ms(&self) -> Option<i64> {
        self.updated_at.or(self.created_at)
    }
}
