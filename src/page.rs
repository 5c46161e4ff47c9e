// src/page.rs

//! Listing details page resolution.
//!
//! Turns an incoming path into what the page should do: render the listing
//! with its metadata, redirect to the fresh canonical path, or show the
//! not-found state. Exactly one canonical path is valid per id at any
//! instant; a correct id with a stale slug redirects instead of rendering.

use serde_json::json;

use crate::cache::ListingCache;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::models::ListingRecord;
use crate::seo::meta::{plan_head_ops, HeadOp, PageMetadata};
use crate::seo::schema::{breadcrumb_list, SchemaBuilder};
use crate::seo::slug::slugify;
use crate::seo::url::{canonical_path, parse_canonical_path};
use crate::store::ListingStore;

/// Safe navigation target for dead ends.
pub const HOME_PATH: &str = "/";

/// What the consuming page should render or do.
#[derive(Debug)]
pub enum PageOutcome {
    /// Render the listing with this metadata
    Found {
        listing: ListingRecord,
        metadata: PageMetadata,
        head_ops: Vec<HeadOp>,
    },
    /// Client-side redirect to the fresh canonical path
    Redirect { to: String },
    /// No matching active record; render not-found with a way home
    NotFound {
        metadata: PageMetadata,
        home_path: &'static str,
    },
    /// Path does not match the canonical shape (includes the legacy
    /// slug-only form)
    InvalidPath,
}

/// Resolve a listing page request.
///
/// Reads through the cache; a miss falls back to the store, and a fresh
/// read is cached for subsequent navigations.
pub async fn resolve_listing_page(
    store: &dyn ListingStore,
    cache: &mut ListingCache,
    config: &SiteConfig,
    path: &str,
) -> Result<PageOutcome> {
    let Some(requested) = parse_canonical_path(path) else {
        return Ok(PageOutcome::InvalidPath);
    };

    let listing = match cache.get(&requested.id) {
        Some(cached) => cached.clone(),
        None => match store.get_listing(&requested.id).await? {
            Some(listing) => {
                cache.insert(listing.clone());
                listing
            }
            None => return Ok(not_found()),
        },
    };

    if !listing.is_viewable() {
        return Ok(not_found());
    }

    // Title changed since the URL was minted: one canonical path per id.
    let fresh_slug = slugify(&listing.title);
    if requested.slug != fresh_slug {
        return Ok(PageOutcome::Redirect {
            to: canonical_path(&listing.id, &listing.title),
        });
    }

    let metadata = listing_metadata(config, &listing);
    let head_ops = plan_head_ops(&config.site, &metadata);

    Ok(PageOutcome::Found {
        listing,
        metadata,
        head_ops,
    })
}

/// Build the page metadata (title, description, keywords, schema) for a
/// viewable listing.
fn listing_metadata(config: &SiteConfig, listing: &ListingRecord) -> PageMetadata {
    let path = canonical_path(&listing.id, &listing.title);

    let mut description = format!(
        "{} pozisyonu için {} şirketi {} bölgesinde eleman arıyor. {}",
        listing.title,
        listing.company,
        listing.location,
        truncate_chars(&listing.description, 150),
    );
    if !listing.salary.trim().is_empty() {
        description.push_str(&format!(" Maaş: {}.", listing.salary));
    }
    description.push_str(" Hemen başvuru yapın!");

    let title_lower = listing.title.to_lowercase();
    let keywords = vec![
        title_lower.clone(),
        format!("{title_lower} iş ilanı"),
        listing.company.to_lowercase(),
        listing.category.clone(),
        listing.location.clone(),
        "iş ilanı".to_string(),
    ];

    let posting = SchemaBuilder::new(config).job_posting(listing);
    let breadcrumbs = breadcrumb_list(
        &config.site.base_url,
        &[("Ana Sayfa", HOME_PATH), (&listing.title, &path)],
    );

    PageMetadata {
        title: format!(
            "{} - {}, {} | {}",
            listing.title, listing.company, listing.location, config.site.site_name
        ),
        description,
        keywords,
        canonical_path: path,
        structured_data: Some(json!([breadcrumbs, posting])),
        noindex: false,
    }
}

fn not_found() -> PageOutcome {
    PageOutcome::NotFound {
        metadata: PageMetadata {
            title: "İlan Bulunamadı".to_string(),
            description: "Aradığınız iş ilanı bulunamadı veya artık aktif değil.".to_string(),
            keywords: Vec::new(),
            canonical_path: HOME_PATH.to_string(),
            structured_data: None,
            noindex: true,
        },
        home_path: HOME_PATH,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::ListingStatus;
    use crate::seo::meta::SCHEMA_SCRIPT_ID;
    use crate::store::MemoryStore;

    fn config() -> SiteConfig {
        SiteConfig::default()
    }

    fn cache() -> ListingCache {
        ListingCache::new(Duration::from_secs(300))
    }

    fn listing(id: &str, title: &str) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            title: title.to_string(),
            company: "Acme".into(),
            location: "İzmir, Konak".into(),
            description: "Deneyimli eleman aranıyor.".into(),
            created_at: Some(1_700_000_000_000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn canonical_path_renders_listing() {
        let store = MemoryStore::new(vec![listing("a1", "Garson Aranıyor")]);
        let mut cache = cache();

        let outcome =
            resolve_listing_page(&store, &mut cache, &config(), "/listing/a1/garson-araniyor")
                .await
                .unwrap();

        match outcome {
            PageOutcome::Found { metadata, head_ops, .. } => {
                assert!(metadata.title.starts_with("Garson Aranıyor - Acme"));
                assert_eq!(metadata.canonical_path, "/listing/a1/garson-araniyor");
                assert!(!metadata.noindex);
                assert!(head_ops
                    .iter()
                    .any(|op| matches!(op, HeadOp::ReplaceSchemaScript { id, .. } if *id == SCHEMA_SCRIPT_ID)));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_slug_redirects_to_fresh_canonical() {
        let store = MemoryStore::new(vec![listing("a1", "Kıdemli Garson Aranıyor")]);
        let mut cache = cache();

        let outcome =
            resolve_listing_page(&store, &mut cache, &config(), "/listing/a1/garson-araniyor")
                .await
                .unwrap();

        match outcome {
            PageOutcome::Redirect { to } => {
                assert_eq!(to, "/listing/a1/kidemli-garson-araniyor");
            }
            other => panic!("expected Redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_listing_is_not_found_with_way_home() {
        let store = MemoryStore::default();
        let mut cache = cache();

        let outcome = resolve_listing_page(&store, &mut cache, &config(), "/listing/yok/ilan")
            .await
            .unwrap();

        match outcome {
            PageOutcome::NotFound { metadata, home_path } => {
                assert_eq!(home_path, HOME_PATH);
                assert!(metadata.noindex);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inactive_listing_is_not_found() {
        let mut record = listing("a1", "Garson");
        record.status = Some(ListingStatus::Inactive);
        let store = MemoryStore::new(vec![record]);
        let mut cache = cache();

        let outcome = resolve_listing_page(&store, &mut cache, &config(), "/listing/a1/garson")
            .await
            .unwrap();
        assert!(matches!(outcome, PageOutcome::NotFound { .. }));
    }

    #[tokio::test]
    async fn legacy_slug_only_path_is_invalid() {
        let store = MemoryStore::new(vec![listing("a1", "Garson")]);
        let mut cache = cache();

        let outcome = resolve_listing_page(&store, &mut cache, &config(), "/listing/garson")
            .await
            .unwrap();
        assert!(matches!(outcome, PageOutcome::InvalidPath));
    }

    #[tokio::test]
    async fn second_navigation_hits_cache() {
        let store = MemoryStore::new(vec![listing("a1", "Garson")]);
        let mut cache = cache();

        let first = resolve_listing_page(&store, &mut cache, &config(), "/listing/a1/garson")
            .await
            .unwrap();
        assert!(matches!(first, PageOutcome::Found { .. }));
        assert_eq!(cache.len(), 1);

        // Swap in an empty store: the cached record must still resolve.
        let empty = MemoryStore::default();
        let second = resolve_listing_page(&empty, &mut cache, &config(), "/listing/a1/garson")
            .await
            .unwrap();
        assert!(matches!(second, PageOutcome::Found { .. }));
    }
}
