// src/bin/cli.rs

//! Local CLI for the listing SEO toolkit.
//!
//! Development and operations entry point: generate the sitemap, ping the
//! search engines, inspect a single listing, resolve a page path, or
//! validate the configuration. For serverless deployment use the
//! `listing-seo-lambda` binary with the `lambda` feature.

use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use env_logger::Env;

use listing_seo::cache::ListingCache;
use listing_seo::config::SiteConfig;
use listing_seo::error::Result;
use listing_seo::notify::{self, PingSummary};
use listing_seo::page::{resolve_listing_page, PageOutcome};
use listing_seo::seo::schema::SchemaBuilder;
use listing_seo::seo::url::canonical_url;
use listing_seo::sitemap::SitemapBuilder;
use listing_seo::store::{FirebaseStore, ListingStore};

#[derive(Parser, Debug)]
#[command(
    name = "listing-seo",
    version = "0.1.0",
    about = "Sitemap, structured data and ping toolkit for the listing site"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the XML sitemap from the current listing snapshot
    Sitemap {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Notify the configured search engines that the sitemap changed
    Ping,
    /// Show one listing with its canonical URL and JSON-LD document
    Show {
        /// Listing record id
        id: String,
    },
    /// Resolve a listing page path (render, redirect or not-found)
    Resolve {
        /// Request path, e.g. /listing/abc123/garson-araniyor
        path: String,
    },
    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = SiteConfig::load_or_default(&cli.config);

    match cli.command {
        Command::Sitemap { output } => run_sitemap(&config, output).await?,
        Command::Ping => run_ping(&config).await?,
        Command::Show { id } => run_show(&config, &id).await?,
        Command::Resolve { path } => run_resolve(&config, &path).await?,
        Command::Validate => run_validate(&cli.config)?,
    }

    Ok(())
}

async fn run_sitemap(config: &SiteConfig, output: Option<String>) -> Result<()> {
    let store = FirebaseStore::new(&config.store)?;
    let records = store.list_listings().await?;
    let sitemap = SitemapBuilder::new(config).generate(&records, Utc::now());

    log::info!(
        "Generated {} URLs from {} records ({} active) in {}ms",
        sitemap.stats.urls,
        sitemap.stats.total,
        sitemap.stats.active,
        sitemap.stats.duration_ms
    );

    match output {
        Some(path) => {
            std::fs::write(&path, &sitemap.xml)?;
            log::info!("Sitemap written to {}", path);
        }
        None => println!("{}", sitemap.xml),
    }

    Ok(())
}

async fn run_ping(config: &SiteConfig) -> Result<()> {
    let sitemap_url = config.sitemap_url();
    let client = notify::create_client(&config.notify)?;

    let results = notify::notify_search_engines(&client, &config.notify, &sitemap_url).await;
    let summary = PingSummary::from_results(results);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_show(config: &SiteConfig, id: &str) -> Result<()> {
    let store = FirebaseStore::new(&config.store)?;

    let Some(listing) = store.get_listing(id).await? else {
        log::warn!("No listing found with id '{}'", id);
        return Ok(());
    };

    let url = canonical_url(&config.site.base_url, &listing.id, &listing.title);
    let posting = SchemaBuilder::new(config).job_posting(&listing);

    println!("{} - {}", listing.title, listing.company);
    println!("{}", url);
    println!("{}", serde_json::to_string_pretty(&posting)?);
    Ok(())
}

async fn run_resolve(config: &SiteConfig, path: &str) -> Result<()> {
    let store = FirebaseStore::new(&config.store)?;
    let mut cache = ListingCache::new(Duration::from_secs(config.cache.ttl_secs));

    match resolve_listing_page(&store, &mut cache, config, path).await? {
        PageOutcome::Found { metadata, .. } => {
            println!("render: {}", metadata.canonical_path);
            println!("title:  {}", metadata.title);
        }
        PageOutcome::Redirect { to } => println!("redirect: {}", to),
        PageOutcome::NotFound { home_path, .. } => println!("not-found (home: {})", home_path),
        PageOutcome::InvalidPath => println!("invalid path"),
    }

    Ok(())
}

fn run_validate(path: &str) -> Result<()> {
    let config = SiteConfig::load(path)?;
    config.validate()?;
    log::info!("Configuration at {} is valid", path);
    Ok(())
}
