// src/seo/meta.rs

//! Document-head metadata synchronization.
//!
//! The core is a pure planner: [`plan_head_ops`] maps desired page metadata
//! to a list of keyed upsert operations. Applying them to an actual document
//! head is delegated to a [`HeadSink`] adapter, so the logic stays testable
//! without a browser document. Because every operation is keyed, repeated
//! application is idempotent and the last call always wins, so rapid
//! navigation never leaves a mix of two listings' tags.

use serde_json::Value;

use crate::config::SiteInfo;

/// Fixed element id for the single structured-data script.
pub const SCHEMA_SCRIPT_ID: &str = "jobposting-schema";

/// Open Graph locale for the Turkish site.
const OG_LOCALE: &str = "tr_TR";

/// Robots directive for indexable pages.
const ROBOTS_INDEX: &str = "index, follow, max-image-preview:large, max-snippet:-1";
/// Robots directive when `noindex` is requested.
const ROBOTS_NOINDEX: &str = "noindex, nofollow";

/// Desired metadata for one page render.
#[derive(Debug, Clone, Default)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Canonical path, site-relative; rendered absolute against `base_url`
    pub canonical_path: String,
    /// JSON-LD document(s) for the structured-data script, if any
    pub structured_data: Option<Value>,
    pub noindex: bool,
}

/// Which attribute identifies a meta element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaAttr {
    /// `<meta name="…">`
    Name,
    /// `<meta property="…">` (Open Graph)
    Property,
}

/// One idempotent head mutation, keyed by its target element.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadOp {
    /// Replace the document title
    SetTitle(String),
    /// Create-or-update a meta element located by `(attr, key)`
    UpsertMeta {
        attr: MetaAttr,
        key: &'static str,
        content: String,
    },
    /// Create-or-update a link element located by its `rel`
    UpsertLink { rel: &'static str, href: String },
    /// Replace the entire content of the script element with the fixed id
    ReplaceSchemaScript { id: &'static str, json: String },
}

/// Plan the full set of head operations for a page.
///
/// Pure function of the site identity and desired metadata; contains no
/// document access.
pub fn plan_head_ops(site: &SiteInfo, meta: &PageMetadata) -> Vec<HeadOp> {
    let canonical = format!(
        "{}{}",
        site.base_url.trim_end_matches('/'),
        meta.canonical_path
    );

    let robots = if meta.noindex {
        ROBOTS_NOINDEX
    } else {
        ROBOTS_INDEX
    };

    let mut ops = vec![
        HeadOp::SetTitle(meta.title.clone()),
        HeadOp::UpsertMeta {
            attr: MetaAttr::Name,
            key: "description",
            content: meta.description.clone(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Name,
            key: "keywords",
            content: meta.keywords.join(", "),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Name,
            key: "robots",
            content: robots.to_string(),
        },
        HeadOp::UpsertLink {
            rel: "canonical",
            href: canonical.clone(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Property,
            key: "og:title",
            content: meta.title.clone(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Property,
            key: "og:description",
            content: meta.description.clone(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Property,
            key: "og:url",
            content: canonical,
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Property,
            key: "og:type",
            content: "website".to_string(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Property,
            key: "og:site_name",
            content: site.site_name.clone(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Property,
            key: "og:locale",
            content: OG_LOCALE.to_string(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Name,
            key: "twitter:card",
            content: "summary_large_image".to_string(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Name,
            key: "twitter:title",
            content: meta.title.clone(),
        },
        HeadOp::UpsertMeta {
            attr: MetaAttr::Name,
            key: "twitter:description",
            content: meta.description.clone(),
        },
    ];

    if let Some(schema) = &meta.structured_data {
        let json = serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string());
        ops.push(HeadOp::ReplaceSchemaScript {
            id: SCHEMA_SCRIPT_ID,
            json,
        });
    }

    ops
}

/// Applies head operations to some document head.
pub trait HeadSink {
    fn apply(&mut self, ops: &[HeadOp]);
}

/// In-memory head model with keyed upserts.
///
/// Serves as the test double and as the reference semantics any real
/// adapter must follow: locating an element by its stable key and updating
/// in place, creating only when absent.
#[derive(Debug, Default)]
pub struct MemoryHead {
    pub title: String,
    metas: Vec<((MetaAttr, &'static str), String)>,
    links: Vec<(&'static str, String)>,
    scripts: Vec<(&'static str, String)>,
}

impl MemoryHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(&self, attr: MetaAttr, key: &str) -> Option<&str> {
        self.metas
            .iter()
            .find(|((a, k), _)| *a == attr && *k == key)
            .map(|(_, content)| content.as_str())
    }

    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|(r, _)| *r == rel)
            .map(|(_, href)| href.as_str())
    }

    pub fn script(&self, id: &str) -> Option<&str> {
        self.scripts
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, json)| json.as_str())
    }

    pub fn meta_count(&self) -> usize {
        self.metas.len()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }
}

impl HeadSink for MemoryHead {
    fn apply(&mut self, ops: &[HeadOp]) {
        for op in ops {
            match op {
                HeadOp::SetTitle(title) => self.title = title.clone(),
                HeadOp::UpsertMeta { attr, key, content } => {
                    match self
                        .metas
                        .iter_mut()
                        .find(|((a, k), _)| a == attr && k == key)
                    {
                        Some((_, existing)) => *existing = content.clone(),
                        None => self.metas.push(((*attr, *key), content.clone())),
                    }
                }
                HeadOp::UpsertLink { rel, href } => {
                    match self.links.iter_mut().find(|(r, _)| r == rel) {
                        Some((_, existing)) => *existing = href.clone(),
                        None => self.links.push((*rel, href.clone())),
                    }
                }
                HeadOp::ReplaceSchemaScript { id, json } => {
                    match self.scripts.iter_mut().find(|(i, _)| i == id) {
                        Some((_, existing)) => *existing = json.clone(),
                        None => self.scripts.push((*id, json.clone())),
                    }
                }
            }
        }
    }
}
