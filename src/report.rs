//! Live progress reporting.
//!
//! The pipeline and download engine announce what happens through a
//! [`ProgressReporter`]; the binary prints, tests record, library callers
//! may ignore. Outcomes arrive in completion order, as each download ends.

use std::path::Path;

use crate::download::{DownloadOutcome, DownloadReport};

/// Receives run events as they happen.
///
/// All methods default to doing nothing. Implementations must be cheap:
/// `outcome` is called from the engine's collection loop, between downloads.
pub trait ProgressReporter: Send + Sync {
    /// The extractor found `count` candidate image URLs.
    fn images_found(&self, _count: usize) {}

    /// The page yielded no image URLs; no download will be attempted.
    fn nothing_found(&self) {}

    /// One download finished (successfully or not).
    fn outcome(&self, _outcome: &DownloadOutcome) {}

    /// All downloads finished.
    fn finished(&self, _report: &DownloadReport, _output_dir: &Path) {}
}

/// Reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
