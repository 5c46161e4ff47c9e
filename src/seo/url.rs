// src/seo/url.rs

//! Identity-stable listing URLs.
//!
//! Every externally exposed listing URL carries the record's immutable id
//! plus a slug derived from the current title. The id is what makes paths
//! unique; the slug is a readability suffix only and is never a lookup key.
//! Slug-only addressing used to collide whenever two titles normalized to
//! the same slug, silently dropping one listing from the sitemap.

use super::slug::slugify;

/// Fixed path prefix for listing pages.
pub const LISTING_PREFIX: &str = "/listing";

/// Parsed components of a canonical listing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPath {
    pub id: String,
    pub slug: String,
}

/// Build the canonical path for a listing: `/listing/{id}/{slug}`.
pub fn canonical_path(id: &str, title: &str) -> String {
    format!("{}/{}/{}", LISTING_PREFIX, id, slugify(title))
}

/// Build the absolute canonical URL for a listing.
pub fn canonical_url(base_url: &str, id: &str, title: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), canonical_path(id, title))
}

/// Inverse-parse a canonical listing path.
///
/// Only the exact two-segment shape after the prefix is accepted. The legacy
/// one-segment `/listing/{slug}` form has no id and returns `None`; callers
/// must not treat it as valid identity.
pub fn parse_canonical_path(path: &str) -> Option<ListingPath> {
    let rest = path.strip_prefix(LISTING_PREFIX)?.strip_prefix('/')?;

    let mut segments = rest.split('/');
    let id = segments.next().filter(|s| !s.is_empty())?;
    let slug = segments.next().filter(|s| !s.is_empty())?;
    if segments.next().is_some() {
        return None;
    }

    Some(ListingPath {
        id: id.to_string(),
        slug: slug.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_path_shape() {
        assert_eq!(
            canonical_path("-Nxa12", "Şoför Aranıyor"),
            "/listing/-Nxa12/sofor-araniyor"
        );
    }

    #[test]
    fn test_canonical_url_trims_base_slash() {
        assert_eq!(
            canonical_url("https://isilanlarim.org/", "a1", "Garson"),
            "https://isilanlarim.org/listing/a1/garson"
        );
    }

    #[test]
    fn test_round_trip() {
        for (id, title) in [
            ("-Nxa12", "Şoför Aranıyor"),
            ("job42", ""),
            ("x", "Part-time Kasiyer (İzmir)"),
        ] {
            let path = canonical_path(id, title);
            let parsed = parse_canonical_path(&path).expect("canonical path must parse");
            assert_eq!(parsed.id, id);
            assert_eq!(parsed.slug, slugify(title));
        }
    }

    #[test]
    fn test_distinct_ids_never_collide() {
        let title = "Garson Aranıyor";
        assert_ne!(canonical_path("id1", title), canonical_path("id2", title));
    }

    #[test]
    fn test_rejects_legacy_single_segment() {
        assert_eq!(parse_canonical_path("/listing/sofor-araniyor"), None);
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert_eq!(parse_canonical_path("/listing"), None);
        assert_eq!(parse_canonical_path("/listing/"), None);
        assert_eq!(parse_canonical_path("/listing/id//"), None);
        assert_eq!(parse_canonical_path("/listing/id/slug/extra"), None);
        assert_eq!(parse_canonical_path("/blog/id/slug"), None);
    }
}
