//! URL-to-filename manifest.
//!
//! Index-based filenames drop the source URL; the manifest records it so a
//! saved `007.jpg` can be traced back to where it came from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use super::engine::{DownloadReport, OutcomeStatus};

/// Manifest filename written into the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Errors writing the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Serialization failed.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the manifest file failed.
    #[error("IO error writing manifest {path}: {source}")]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// 1-based position in the sorted URL list.
    pub index: usize,
    /// Source image URL.
    pub url: String,
    /// Filename inside the output directory.
    pub file: String,
    /// Whether the file was saved.
    pub saved: bool,
    /// Bytes written, for saved files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Captured error, for failed downloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Builds manifest rows from `report`, ordered by index.
#[must_use]
pub fn manifest_entries(report: &DownloadReport) -> Vec<ManifestEntry> {
    report
        .outcomes_by_index()
        .into_iter()
        .map(|outcome| {
            let (saved, bytes, error) = match &outcome.status {
                OutcomeStatus::Saved { bytes } => (true, Some(*bytes), None),
                OutcomeStatus::Failed { error } => (false, None, Some(error.clone())),
            };
            ManifestEntry {
                index: outcome.index,
                url: outcome.url.clone(),
                file: outcome
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                saved,
                bytes,
                error,
            }
        })
        .collect()
}

/// Writes `manifest.json` for `report` into `output_dir`, returning its path.
///
/// # Errors
///
/// Returns [`ManifestError`] if serialization or the file write fails.
#[instrument(skip(report), fields(output_dir = %output_dir.display()))]
pub async fn write_manifest(
    report: &DownloadReport,
    output_dir: &Path,
) -> Result<PathBuf, ManifestError> {
    let path = output_dir.join(MANIFEST_FILENAME);
    let json = serde_json::to_vec_pretty(&manifest_entries(report))?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), entries = report.total(), "manifest written");
    Ok(path)
}
