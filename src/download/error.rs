//! Why a single image failed to save.
//!
//! Messages describe only the failure. The console and the manifest already
//! print the image URL next to them, so the URL stays in the fields.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one image download. Never aborts the batch.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The CDN could not be reached or the connection broke.
    #[error("connection failed: {source}")]
    Network {
        /// Image URL.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The CDN sent nothing for a whole read timeout.
    #[error("timed out waiting for image data")]
    Timeout {
        /// Image URL.
        url: String,
    },

    /// The CDN answered with a non-2xx status.
    #[error("HTTP {status}")]
    HttpStatus {
        /// Image URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The image file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extracted URL does not parse.
    #[error("not a valid image URL")]
    InvalidUrl {
        /// The rejected string.
        url: String,
    },
}

impl DownloadError {
    /// Classifies a reqwest error as [`Self::Timeout`] or [`Self::Network`].
    #[must_use]
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    #[must_use]
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    #[must_use]
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// The image URL this failure concerns, when it has one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::InvalidUrl { url } => Some(url),
            Self::Io { .. } => None,
        }
    }
}
