// src/config.rs

//! Application configuration structures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public site identity
    #[serde(default)]
    pub site: SiteInfo,

    /// Fallback address used when a record has no usable location
    #[serde(default)]
    pub location: LocationDefaults,

    /// Listing store connection settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Client-side listing cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Search-engine notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Sitemap generation settings
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Build configuration from environment variables over defaults.
    ///
    /// This is the Lambda path: serverless deployments carry no config file,
    /// only `SITE_URL` / `DATABASE_URL` style variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SITE_URL") {
            config.site.base_url = url;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.store.database_url = url;
        }
        if let Ok(path) = std::env::var("LISTING_COLLECTION") {
            config.store.collection = path;
        }
        if let Ok(secs) = std::env::var("NOTIFY_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.notify.timeout_secs = secs;
            }
        }
        config
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        if !self.site.base_url.starts_with("http") {
            return Err(AppError::validation("site.base_url must be absolute"));
        }
        if self.store.database_url.trim().is_empty() {
            return Err(AppError::validation("store.database_url is empty"));
        }
        if self.store.collection.trim().is_empty() {
            return Err(AppError::validation("store.collection is empty"));
        }
        if self.store.timeout_secs == 0 {
            return Err(AppError::validation("store.timeout_secs must be > 0"));
        }
        if self.notify.timeout_secs == 0 {
            return Err(AppError::validation("notify.timeout_secs must be > 0"));
        }
        if self.notify.endpoints.is_empty() {
            return Err(AppError::validation("No ping endpoints defined"));
        }
        if self.location.locality.trim().is_empty() || self.location.region.trim().is_empty() {
            return Err(AppError::validation("Default locality/region must be set"));
        }
        Ok(())
    }

    /// Absolute URL of the published sitemap document.
    pub fn sitemap_url(&self) -> String {
        format!(
            "{}/{}",
            self.site.base_url.trim_end_matches('/'),
            self.sitemap.public_file
        )
    }
}

/// Public identity of the site, used for fallbacks in structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Absolute base URL, no trailing slash
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Site display name, appended to page titles
    #[serde(default = "defaults::site_name")]
    pub site_name: String,

    /// Placeholder organization name when a record has no company
    #[serde(default = "defaults::organization")]
    pub organization: String,

    /// Organization logo URL
    #[serde(default = "defaults::logo_url")]
    pub logo_url: String,

    /// Fallback application contact email
    #[serde(default = "defaults::contact_email")]
    pub contact_email: String,

    /// Fallback application contact phone
    #[serde(default = "defaults::contact_phone")]
    pub contact_phone: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            site_name: defaults::site_name(),
            organization: defaults::organization(),
            logo_url: defaults::logo_url(),
            contact_email: defaults::contact_email(),
            contact_phone: defaults::contact_phone(),
        }
    }
}

/// Address fallback for records with an empty location field.
///
/// The downstream consumer rejects an incomplete address outright, which is
/// worse than a wrong-but-valid default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDefaults {
    #[serde(default = "defaults::locality")]
    pub locality: String,

    #[serde(default = "defaults::locality")]
    pub region: String,

    #[serde(default = "defaults::country")]
    pub country: String,
}

impl Default for LocationDefaults {
    fn default() -> Self {
        Self {
            locality: defaults::locality(),
            region: defaults::locality(),
            country: defaults::country(),
        }
    }
}

/// Listing store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Realtime database base URL
    #[serde(default = "defaults::database_url")]
    pub database_url: String,

    /// Collection path holding listing records
    #[serde(default = "defaults::collection")]
    pub collection: String,

    /// Request timeout in seconds for store reads
    #[serde(default = "defaults::store_timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::database_url(),
            collection: defaults::collection(),
            timeout_secs: defaults::store_timeout(),
        }
    }
}

/// Client-side listing cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::cache_ttl(),
        }
    }
}

/// Search-engine notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Per-endpoint timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,

    /// Configured search engine ping endpoints
    #[serde(default = "defaults::ping_endpoints")]
    pub endpoints: Vec<PingEndpoint>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::notify_timeout(),
            endpoints: defaults::ping_endpoints(),
        }
    }
}

/// One search engine ping target.
///
/// `url_base` receives the URL-encoded sitemap URL as its `sitemap` query
/// parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingEndpoint {
    /// Engine display name for result reporting
    pub name: String,

    /// Ping URL without the sitemap query parameter
    pub url_base: String,
}

/// Sitemap generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Fixed changefreq hint emitted per entry
    #[serde(default = "defaults::changefreq")]
    pub changefreq: String,

    /// Public filename the sitemap is served under
    #[serde(default = "defaults::public_file")]
    pub public_file: String,

    /// Shared-cache max-age in seconds for the HTTP response
    #[serde(default = "defaults::cache_max_age")]
    pub cache_max_age_secs: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            changefreq: defaults::changefreq(),
            public_file: defaults::public_file(),
            cache_max_age_secs: defaults::cache_max_age(),
        }
    }
}

mod defaults {
    use super::PingEndpoint;

    pub fn base_url() -> String {
        "https://isilanlarim.org".into()
    }
    pub fn site_name() -> String {
        "İşBuldum".into()
    }
    pub fn organization() -> String {
        "İşveren".into()
    }
    pub fn logo_url() -> String {
        "https://isilanlarim.org/logo.png".into()
    }
    pub fn contact_email() -> String {
        "info@isilanlarim.org".into()
    }
    pub fn contact_phone() -> String {
        "+905459772134".into()
    }

    pub fn locality() -> String {
        "İzmir".into()
    }
    pub fn country() -> String {
        "TR".into()
    }

    pub fn database_url() -> String {
        "https://btc3-d7d9b-default-rtdb.firebaseio.com".into()
    }
    pub fn collection() -> String {
        "jobs".into()
    }
    pub fn store_timeout() -> u64 {
        15
    }

    pub fn cache_ttl() -> u64 {
        300
    }

    pub fn notify_timeout() -> u64 {
        5
    }
    pub fn ping_endpoints() -> Vec<PingEndpoint> {
        vec![
            PingEndpoint {
                name: "Google".into(),
                url_base: "https://www.google.com/ping".into(),
            },
            PingEndpoint {
                name: "Bing".into(),
                url_base: "https://www.bing.com/ping".into(),
            },
        ]
    }

    pub fn changefreq() -> String {
        "daily".into()
    }
    pub fn public_file() -> String {
        "sitemap-jobs.xml".into()
    }
    pub fn cache_max_age() -> u64 {
        3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let mut config = SiteConfig::default();
        config.site.base_url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut config = SiteConfig::default();
        config.site.base_url = "isilanlarim.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_no_endpoints() {
        let mut config = SiteConfig::default();
        config.notify.endpoints.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn sitemap_url_joins_cleanly() {
        let mut config = SiteConfig::default();
        config.site.base_url = "https://example.org/".into();
        assert_eq!(config.sitemap_url(), "https://example.org/sitemap-jobs.xml");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [site]
            base_url = "https://test.example"
            "#,
        )
        .unwrap();
        assert_eq!(config.site.base_url, "https://test.example");
        assert_eq!(config.location.country, "TR");
        assert_eq!(config.notify.endpoints.len(), 2);
    }
}
