//! Fetch → extract → download orchestration for one listing page.
//!
//! Stages run strictly in sequence: the page is fully fetched before
//! extraction, and extraction completes before the first download starts.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument};

use crate::config::{ScrapeConfig, SitePolicy};
use crate::download::{DownloadEngine, DownloadReport, EngineError, HttpClient, ManifestError};
use crate::download::manifest::write_manifest;
use crate::extract::{ExtractError, ImageExtractor};
use crate::page::{FetchError, PageFetcher};
use crate::report::ProgressReporter;

/// Errors that abort a run.
///
/// Individual download failures are not errors; they are reported in the
/// [`DownloadReport`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// Directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The listing page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The site policy is unusable.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The worker count is out of range.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The manifest could not be written.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page held no recognizable images; nothing was downloaded.
    NothingFound,
    /// Downloads were attempted for every extracted URL.
    Completed(DownloadReport),
}

/// Runs the whole pipeline with a fresh [`HttpClient`].
///
/// # Errors
///
/// See [`run_with_client`].
pub async fn run(
    config: &ScrapeConfig,
    policy: &SitePolicy,
    reporter: &dyn ProgressReporter,
) -> Result<RunOutcome, PipelineError> {
    let client = HttpClient::try_new().map_err(PipelineError::Client)?;
    run_with_client(&client, config, policy, reporter).await
}

/// Runs the whole pipeline on `client`.
///
/// The output directory is created (with parents) first. An empty
/// extraction is reported through [`ProgressReporter::nothing_found`] and
/// returns [`RunOutcome::NothingFound`] without invoking the downloader.
///
/// # Errors
///
/// Returns [`PipelineError`] if the worker count or site policy is invalid,
/// the output directory cannot be created, the page fetch fails, or the
/// manifest cannot be written.
#[instrument(skip_all, fields(url = %config.page_url, output_dir = %config.output_dir.display()))]
pub async fn run_with_client(
    client: &HttpClient,
    config: &ScrapeConfig,
    policy: &SitePolicy,
    reporter: &dyn ProgressReporter,
) -> Result<RunOutcome, PipelineError> {
    let engine = DownloadEngine::new(config.workers)?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| PipelineError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

    let html = PageFetcher::new(client.clone())
        .fetch(&config.page_url)
        .await?;

    let urls = ImageExtractor::new(policy)?.extract(&html);
    if urls.is_empty() {
        info!("no image urls found");
        reporter.nothing_found();
        return Ok(RunOutcome::NothingFound);
    }
    info!(images = urls.len(), "extracted image urls");
    reporter.images_found(urls.len());

    let report = engine
        .download_all(client, &urls, &config.output_dir, policy, reporter)
        .await;

    if config.write_manifest {
        write_manifest(&report, &config.output_dir).await?;
    }

    reporter.finished(&report, &config.output_dir);
    Ok(RunOutcome::Completed(report))
}
