// src/bin/lambda.rs

//! Lambda entry point for the sitemap and ping functions.
//!
//! One deployment serves both routes: `GET /sitemap` returns the generated
//! XML document and `POST /ping` notifies the configured search engines.
//!
//! ## Environment Variables
//!
//! - `SITE_URL`: Public site base URL (default: `https://isilanlarim.org`)
//! - `DATABASE_URL`: Realtime database base URL
//! - `LISTING_COLLECTION`: Collection path holding listing records
//! - `NOTIFY_TIMEOUT_SECS`: Per-endpoint ping timeout
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

#[cfg(feature = "lambda")]
use lambda_http::{service_fn, Body, Error, Request, Response};
#[cfg(feature = "lambda")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "lambda")]
use listing_seo::config::SiteConfig;
#[cfg(feature = "lambda")]
use listing_seo::handler;
#[cfg(feature = "lambda")]
use listing_seo::store::FirebaseStore;

#[cfg(feature = "lambda")]
async fn route(
    config: &SiteConfig,
    store: &FirebaseStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    match event.uri().path() {
        path if path.ends_with("/ping") => handler::handle_ping(config, event).await,
        _ => handler::handle_sitemap(config, store, event).await,
    }
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for Lambda
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = SiteConfig::from_env();
    config.validate()?;
    let store = FirebaseStore::new(&config.store)?;

    tracing::info!("Listing SEO Lambda starting...");

    lambda_http::run(service_fn(|event: Request| {
        route(&config, &store, event)
    }))
    .await
}

#[cfg(not(feature = "lambda"))]
fn main() {
    eprintln!("This binary requires the 'lambda' feature.");
    eprintln!("Build with: cargo build --bin listing-seo-lambda --features lambda");
    std::process::exit(1);
}
