// src/sitemap.rs

//! XML sitemap generation over the full listing set.
//!
//! Always rebuilt from a complete snapshot; there is no incremental update.
//! Only publicly listed records are emitted. One malformed record never
//! aborts generation: it is counted, logged and skipped.

use std::collections::HashSet;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::config::SiteConfig;
use crate::models::ListingRecord;
use crate::seo::url::canonical_url;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Operational counters for one generation run.
///
/// Exposed out-of-band (response headers) so monitoring never has to parse
/// the XML body.
#[derive(Debug, Clone)]
pub struct SitemapStats {
    /// Records seen in the snapshot
    pub total: usize,
    /// Records passing the public-listing filter
    pub active: usize,
    /// `<url>` entries emitted
    pub urls: usize,
    /// Entries skipped because their canonical path repeated
    pub duplicates_skipped: usize,
    /// Records skipped as malformed
    pub record_errors: usize,
    /// Wall-clock generation time
    pub duration_ms: u64,
    /// Generation instant
    pub generated_at: DateTime<Utc>,
}

/// A generated sitemap document with its stats.
#[derive(Debug, Clone)]
pub struct Sitemap {
    pub xml: String,
    pub stats: SitemapStats,
}

/// Generates sitemap documents against a site configuration.
pub struct SitemapBuilder<'a> {
    config: &'a SiteConfig,
}

impl<'a> SitemapBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Generate the sitemap for a snapshot of the listing set.
    ///
    /// `now` pins age calculations and the generation timestamp for
    /// reproducible output.
    pub fn generate(&self, records: &[ListingRecord], now: DateTime<Utc>) -> Sitemap {
        let started = Instant::now();

        let total = records.len();
        let mut active_records: Vec<&ListingRecord> = records
            .iter()
            .filter(|r| r.is_publicly_listed())
            .collect();
        let active = active_records.len();

        // Most recent activity first; id as tie-breaker for determinism.
        active_records.sort_by(|a, b| {
            b.last_activity_ms()
                .unwrap_or(0)
                .cmp(&a.last_activity_ms().unwrap_or(0))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut seen_locs: HashSet<String> = HashSet::new();
        let mut entries = String::new();
        let mut urls = 0usize;
        let mut duplicates_skipped = 0usize;
        let mut record_errors = 0usize;

        for record in active_records {
            if record.id.trim().is_empty() {
                record_errors += 1;
                log::warn!("Skipping listing without id (title: {:?})", record.title);
                continue;
            }

            let loc = canonical_url(&self.config.site.base_url, &record.id, &record.title);

            // Identifier-qualified paths cannot collide between distinct
            // records; a repeat still must not produce duplicate <loc>.
            if !seen_locs.insert(loc.clone()) {
                duplicates_skipped += 1;
                log::warn!("Duplicate canonical path skipped: {}", loc);
                continue;
            }

            let lastmod = record
                .last_activity_ms()
                .filter(|ms| *ms > 0)
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .unwrap_or(now)
                .to_rfc3339_opts(SecondsFormat::Millis, true);

            let priority = priority_for(record.created_at, now);

            entries.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
                 <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
                xml_escape(&loc),
                lastmod,
                xml_escape(&self.config.sitemap.changefreq),
                priority,
            ));
            urls += 1;
        }

        let stats = SitemapStats {
            total,
            active,
            urls,
            duplicates_skipped,
            record_errors,
            duration_ms: started.elapsed().as_millis() as u64,
            generated_at: now,
        };

        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
             <!--\n  Listing sitemap\n  Generated: {}\n  Total: {}\n  Active: {}\n  \
             URLs: {}\n-->\n{}</urlset>\n",
            stats.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            stats.total,
            stats.active,
            stats.urls,
            entries,
        );

        log::info!(
            "Sitemap generated: {} urls from {} records ({} active) in {}ms",
            stats.urls,
            stats.total,
            stats.active,
            stats.duration_ms
        );

        Sitemap { xml, stats }
    }
}

/// Build the minimal valid document emitted when generation cannot run.
pub fn error_sitemap(message: &str, now: DateTime<Utc>) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         <!--\n  Error generating sitemap\n  Error: {}\n  Generated: {}\n-->\n</urlset>\n",
        xml_escape(message),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Crawl-priority decay by listing age: newer listings rank higher.
fn priority_for(created_at_ms: Option<i64>, now: DateTime<Utc>) -> &'static str {
    let created = match created_at_ms.filter(|ms| *ms > 0) {
        Some(ms) => ms,
        None => return "1.0",
    };

    let age_days = (now.timestamp_millis() - created) as f64 / MS_PER_DAY;
    if age_days < 1.0 {
        "1.0"
    } else if age_days < 3.0 {
        "0.95"
    } else if age_days < 7.0 {
        "0.9"
    } else if age_days < 14.0 {
        "0.85"
    } else if age_days < 30.0 {
        "0.8"
    } else {
        "0.7"
    }
}

/// Escape the five XML-reserved characters.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
