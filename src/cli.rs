//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use listing_photos_core::config::{
    DEFAULT_CDN_HOST_FRAGMENT, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_URL, DEFAULT_REFERER,
};
use listing_photos_core::{DEFAULT_CONCURRENCY, ScrapeConfig, SitePolicy};

/// Download every photo referenced by a listing page.
///
/// Fetches the page, collects image URLs hosted on the listing site's CDN,
/// and saves them concurrently as 001.jpg, 002.jpg, ... in the output folder.
#[derive(Parser, Debug)]
#[command(name = "listing-photos")]
#[command(author, version, about)]
pub struct Args {
    /// Listing page URL
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    pub url: String,

    /// Output folder for images (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub out: PathBuf,

    /// Number of parallel downloads (1-100)
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub workers: u8,

    /// Write manifest.json mapping each file to its source URL
    #[arg(long)]
    pub manifest: bool,

    /// Hostname fragment identifying the image CDN
    #[arg(long, default_value = DEFAULT_CDN_HOST_FRAGMENT)]
    pub cdn_host: String,

    /// Referer sent with image requests
    #[arg(long, default_value = DEFAULT_REFERER)]
    pub referer: String,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output (errors are still shown)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the run configuration from the parsed flags.
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            page_url: self.url.clone(),
            output_dir: self.out.clone(),
            workers: usize::from(self.workers),
            write_manifest: self.manifest,
        }
    }

    /// Builds the site policy from the parsed flags.
    pub fn site_policy(&self) -> SitePolicy {
        SitePolicy::default()
            .with_cdn_host_fragment(self.cdn_host.clone())
            .with_referer(self.referer.clone())
    }
}
