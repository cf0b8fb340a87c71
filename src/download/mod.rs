//! Concurrent image downloads to index-named files.
//!
//! # Features
//!
//! - Streaming downloads through a 64 KiB write buffer
//! - Bounded worker pool (8 by default), one attempt per URL
//! - `{index:03}.{ext}` filenames fixed at dispatch, independent of completion order
//! - Per-URL failures captured as outcomes, never aborting the batch
//! - Optional URL-to-filename manifest
//!
//! # Example
//!
//! ```
//! use listing_photos_core::download::indexed_filename;
//!
//! let name = indexed_filename(
//!     3,
//!     "https://cf.bstatic.com/xdata/images/hotel/3.png?k=1",
//!     &["jpg".to_string(), "png".to_string()],
//!     "jpg",
//! );
//! assert_eq!(name, "003.png");
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
pub mod manifest;

pub use client::HttpClient;
pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadJob, DownloadOutcome, DownloadReport, EngineError,
    OutcomeStatus, plan_jobs,
};
pub use error::DownloadError;
pub use filename::{image_extension_from_url, indexed_filename, indexed_path};
pub use manifest::{MANIFEST_FILENAME, ManifestEntry, ManifestError, write_manifest};
