//! Constants for the download module (timeouts, chunking, worker bounds).

/// Read timeout for the listing page fetch (45 seconds): connect plus
/// response head, then each body read.
pub const PAGE_TIMEOUT_SECS: u64 = 45;

/// Read timeout for a single image download (30 seconds), applied the same
/// way.
pub const IMAGE_TIMEOUT_SECS: u64 = 30;

/// Size of each write to the output file (64 KiB).
pub const WRITE_CHUNK_SIZE: usize = 64 * 1024;

/// Minimum allowed worker count.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed worker count.
pub const MAX_CONCURRENCY: usize = 100;
