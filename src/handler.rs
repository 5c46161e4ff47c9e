// src/handler.rs

//! Serverless HTTP handlers for the sitemap and ping functions.

use chrono::{SecondsFormat, Utc};
use lambda_http::http::{header, StatusCode};
use lambda_http::{Body, Error as LambdaError, Request, Response};
use tracing::{error, info, instrument};

use crate::config::SiteConfig;
use crate::notify::{self, PingSummary};
use crate::sitemap::{error_sitemap, SitemapBuilder};
use crate::store::ListingStore;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Serve the sitemap entry point: `GET` returns the XML document, `OPTIONS`
/// answers the preflight, anything else is rejected.
#[instrument(skip(config, store, event))]
pub async fn handle_sitemap(
    config: &SiteConfig,
    store: &dyn ListingStore,
    event: Request,
) -> Result<Response<Body>, LambdaError> {
    match event.method().as_str() {
        "OPTIONS" => preflight("GET, OPTIONS"),
        "GET" => sitemap_response(config, store).await,
        _ => method_not_allowed("GET, OPTIONS"),
    }
}

async fn sitemap_response(
    config: &SiteConfig,
    store: &dyn ListingStore,
) -> Result<Response<Body>, LambdaError> {
    let now = Utc::now();

    let records = match store.list_listings().await {
        Ok(records) => records,
        Err(e) => {
            // Degraded response, never an empty-but-200 body.
            error!("Listing store unreachable: {}", e);
            return Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
                .header(header::CACHE_CONTROL, "no-cache")
                .header("Access-Control-Allow-Origin", "*")
                .body(Body::from(error_sitemap(&e.to_string(), now)))?);
        }
    };

    let sitemap = SitemapBuilder::new(config).generate(&records, now);
    info!(
        urls = sitemap.stats.urls,
        active = sitemap.stats.active,
        total = sitemap.stats.total,
        "Sitemap generated"
    );

    let cache_control = format!(
        "public, max-age={}, s-maxage={}",
        config.sitemap.cache_max_age_secs, config.sitemap.cache_max_age_secs
    );

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, cache_control)
        .header("X-Robots-Tag", "noindex")
        .header("Access-Control-Allow-Origin", "*")
        .header("X-Total-Listings", sitemap.stats.total.to_string())
        .header("X-Active-Listings", sitemap.stats.active.to_string())
        .header("X-Urls-Generated", sitemap.stats.urls.to_string())
        .header("X-Record-Errors", sitemap.stats.record_errors.to_string())
        .header(
            "X-Generation-Time-Ms",
            sitemap.stats.duration_ms.to_string(),
        )
        .header(
            "X-Generated-At",
            sitemap
                .stats
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        )
        .body(Body::from(sitemap.xml))?)
}

/// Serve the ping entry point: `POST` notifies the configured search
/// engines and returns the per-endpoint summary.
#[instrument(skip(config, event))]
pub async fn handle_ping(
    config: &SiteConfig,
    event: Request,
) -> Result<Response<Body>, LambdaError> {
    match event.method().as_str() {
        "OPTIONS" => preflight("POST, OPTIONS"),
        "POST" => ping_response(config).await,
        _ => method_not_allowed("POST, OPTIONS"),
    }
}

async fn ping_response(config: &SiteConfig) -> Result<Response<Body>, LambdaError> {
    let sitemap_url = config.sitemap_url();
    info!("Pinging search engines for {}", sitemap_url);

    let client = match notify::create_client(&config.notify) {
        Ok(client) => client,
        Err(e) => {
            error!("Could not build ping client: {}", e);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                }),
            );
        }
    };

    let results = notify::notify_search_engines(&client, &config.notify, &sitemap_url).await;
    let summary = PingSummary::from_results(results);
    json_response(StatusCode::OK, &serde_json::to_value(&summary)?)
}

fn preflight(methods: &str) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Allow-Methods", methods)
        .body(Body::Empty)?)
}

fn method_not_allowed(allowed: &str) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(header::ALLOW, allowed)
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::from(
            serde_json::json!({"error": "Method not allowed"}).to_string(),
        ))?)
}

fn json_response(
    status: StatusCode,
    value: &serde_json::Value,
) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::from(value.to_string()))?)
}
