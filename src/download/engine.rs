//! Download engine for concurrent image downloads.
//!
//! This module provides the `DownloadEngine` which downloads a sorted list
//! of image URLs into index-named files using a semaphore-bounded pool of
//! Tokio tasks.
//!
//! # Example
//!
//! ```no_run
//! use listing_photos_core::config::SitePolicy;
//! use listing_photos_core::download::{DownloadEngine, HttpClient};
//! use listing_photos_core::report::SilentReporter;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(8)?;
//! let client = HttpClient::try_new()?;
//! let urls = vec!["https://cf.bstatic.com/xdata/images/hotel/1.jpg".to_string()];
//! let report = engine
//!     .download_all(&client, &urls, Path::new("./photos"), &SitePolicy::default(), &SilentReporter)
//!     .await;
//! println!("Saved: {}, Failed: {}", report.saved(), report.failed());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::constants::{IMAGE_TIMEOUT_SECS, MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::filename::indexed_path;
use crate::config::SitePolicy;
use crate::report::ProgressReporter;
use crate::user_agent::image_headers;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// One URL scheduled for download, with its fixed index and target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// 1-based position in the sorted URL list.
    pub index: usize,
    /// Image URL.
    pub url: String,
    /// Target file (`{index:03}.{ext}` under the output directory).
    pub path: PathBuf,
}

/// Whether a download saved its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The image was written in full.
    Saved {
        /// Bytes written to disk.
        bytes: u64,
    },
    /// The download failed; the text is the captured error.
    Failed {
        /// Human-readable error.
        error: String,
    },
}

/// Result of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// 1-based position in the sorted URL list.
    pub index: usize,
    /// Image URL.
    pub url: String,
    /// Target file path assigned at dispatch.
    pub path: PathBuf,
    /// Success or failure.
    pub status: OutcomeStatus,
}

impl DownloadOutcome {
    fn new(job: DownloadJob, status: OutcomeStatus) -> Self {
        Self {
            index: job.index,
            url: job.url,
            path: job.path,
            status,
        }
    }

    /// Returns true if the image was saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self.status, OutcomeStatus::Saved { .. })
    }

    /// Returns the captured error text for a failed download.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { error } => Some(error),
            OutcomeStatus::Saved { .. } => None,
        }
    }
}

/// Outcomes of a batch, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    /// Creates a report from already-collected outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<DownloadOutcome>) -> Self {
        Self { outcomes }
    }

    /// Returns the number of saved images.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.saved()
    }

    /// Returns the number of attempted downloads.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the outcomes in the order downloads finished.
    #[must_use]
    pub fn outcomes(&self) -> &[DownloadOutcome] {
        &self.outcomes
    }

    /// Returns the outcomes ordered by index.
    #[must_use]
    pub fn outcomes_by_index(&self) -> Vec<&DownloadOutcome> {
        let mut sorted: Vec<&DownloadOutcome> = self.outcomes.iter().collect();
        sorted.sort_by_key(|o| o.index);
        sorted
    }
}

/// Assigns 1-based indices and target paths to `urls`, in input order.
#[must_use]
pub fn plan_jobs(urls: &[String], output_dir: &Path, policy: &SitePolicy) -> Vec<DownloadJob> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| {
            let index = i + 1;
            DownloadJob {
                index,
                url: url.clone(),
                path: indexed_path(
                    output_dir,
                    index,
                    url,
                    &policy.image_extensions,
                    &policy.fallback_extension,
                ),
            }
        })
        .collect()
}

/// Download engine for concurrent image downloads.
///
/// # Concurrency Model
///
/// - Every job is spawned into a `JoinSet` up front
/// - Each task acquires a semaphore permit before its request, so at most
///   `concurrency` downloads are in flight
/// - Permits are released automatically when downloads complete (RAII)
/// - Outcomes are collected and reported in completion order
///
/// There is no retry: each URL gets exactly one attempt per run, and a
/// failure never affects sibling downloads.
#[derive(Debug)]
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
    /// Longest wait on the server for any single read.
    timeout: Duration,
}

impl DownloadEngine {
    /// Creates a new download engine with the specified concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use listing_photos_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(8).unwrap();
    /// assert_eq!(engine.concurrency(), 8);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            timeout: Duration::from_secs(IMAGE_TIMEOUT_SECS),
        })
    }

    /// Overrides the read timeout (30 seconds by default).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the read timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Downloads every URL in `urls` into `output_dir`.
    ///
    /// The `i`-th URL (1-based) is saved as `{i:03}.{ext}` regardless of
    /// when it finishes. `reporter.outcome` fires as each download ends.
    /// The returned report always holds exactly one outcome per URL.
    ///
    /// `output_dir` must already exist.
    #[instrument(skip_all, fields(urls = urls.len(), output_dir = %output_dir.display()))]
    pub async fn download_all(
        &self,
        client: &HttpClient,
        urls: &[String],
        output_dir: &Path,
        policy: &SitePolicy,
        reporter: &dyn ProgressReporter,
    ) -> DownloadReport {
        let jobs = plan_jobs(urls, output_dir, policy);
        let headers = image_headers(&policy.referer);
        let client = client.clone();
        let timeout = self.timeout;

        self.dispatch(jobs, reporter, move |job: DownloadJob| {
            let client = client.clone();
            let headers = headers.clone();
            async move {
                match client
                    .download_to_path(&job.url, &job.path, headers, timeout)
                    .await
                {
                    Ok(bytes) => OutcomeStatus::Saved { bytes },
                    Err(e) => OutcomeStatus::Failed {
                        error: e.to_string(),
                    },
                }
            }
        })
        .await
    }

    /// Runs `download` for every job on the bounded pool.
    ///
    /// Outcomes reach `reporter` in completion order. A job whose task
    /// panics is reported as failed, so the report always holds one outcome
    /// per job.
    async fn dispatch<F, Fut>(
        &self,
        jobs: Vec<DownloadJob>,
        reporter: &dyn ProgressReporter,
        download: F,
    ) -> DownloadReport
    where
        F: Fn(DownloadJob) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = OutcomeStatus> + Send + 'static,
    {
        let mut pending: BTreeMap<usize, DownloadJob> = BTreeMap::new();
        let mut tasks = JoinSet::new();

        info!(concurrency = self.concurrency, "starting downloads");

        for job in jobs {
            pending.insert(job.index, job.clone());

            let semaphore = Arc::clone(&self.semaphore);
            let download = download.clone();

            tasks.spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    let status = OutcomeStatus::Failed {
                        error: "download pool closed".to_string(),
                    };
                    return DownloadOutcome::new(job, status);
                };

                let status = download(job.clone()).await;
                DownloadOutcome::new(job, status)
            });
        }

        let mut report = DownloadReport::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    pending.remove(&outcome.index);
                    record(&mut report, outcome, reporter);
                }
                // The job stays in `pending` and is reported below.
                Err(e) => warn!(error = %e, "download task panicked"),
            }
        }

        for (_, job) in pending {
            let status = OutcomeStatus::Failed {
                error: "download task panicked".to_string(),
            };
            record(&mut report, DownloadOutcome::new(job, status), reporter);
        }

        info!(
            saved = report.saved(),
            failed = report.failed(),
            total = report.total(),
            "downloads complete"
        );

        report
    }
}

fn record(report: &mut DownloadReport, outcome: DownloadOutcome, reporter: &dyn ProgressReporter) {
    match &outcome.status {
        OutcomeStatus::Saved { bytes } => {
            debug!(index = outcome.index, path = %outcome.path.display(), bytes, "download completed");
        }
        OutcomeStatus::Failed { error } => {
            warn!(index = outcome.index, url = %outcome.url, error = %error, "download failed");
        }
    }
    reporter.outcome(&outcome);
    report.outcomes.push(outcome);
}
