//! Listing Photos Core Library
//!
//! Fetches one listing page, extracts the photo URLs it references, and
//! downloads them concurrently into index-named files.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration and site heuristics (CDN host, extensions)
//! - [`page`] - Listing page fetch
//! - [`extract`] - Image URL extraction from markup
//! - [`download`] - Concurrent streaming downloads and the optional manifest
//! - [`report`] - Live progress reporting seam
//! - [`pipeline`] - Stage orchestration for a full run
//! - [`user_agent`] - Browser-identifying request headers

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod extract;
pub mod page;
pub mod pipeline;
pub mod report;
pub mod user_agent;

// Re-export commonly used types
pub use config::{ScrapeConfig, SitePolicy};
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadOutcome, DownloadReport,
    EngineError, HttpClient, OutcomeStatus,
};
pub use extract::{ExtractError, ImageExtractor, extract_image_urls};
pub use page::{FetchError, PageFetcher};
pub use pipeline::{PipelineError, RunOutcome, run, run_with_client};
pub use report::{ProgressReporter, SilentReporter};
