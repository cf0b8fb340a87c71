//! Run configuration and site heuristics.
//!
//! The extractor's CDN host match and extension allowlist are site policy,
//! not extraction logic, so they live here as named values that can be
//! swapped without touching [`crate::extract`].

use std::path::PathBuf;

use crate::download::DEFAULT_CONCURRENCY;

/// Listing page fetched when no URL is given.
pub const DEFAULT_PAGE_URL: &str = "https://www.booking.com/hotel/rs/belgrade-river-house.sr.html";

/// Output directory (relative to the working directory) used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "booking_images/belgrade-river-house";

/// Hostname fragment of the image CDN serving listing photos.
pub const DEFAULT_CDN_HOST_FRAGMENT: &str = "bstatic.com";

/// Referer sent with every image request.
pub const DEFAULT_REFERER: &str = "https://www.booking.com/";

/// Image file extensions accepted by the extractor and used for file naming.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Extension used when a URL path carries no recognizable image extension.
pub const FALLBACK_EXTENSION: &str = "jpg";

/// CSS selector for image-bearing tags.
pub const IMAGE_TAG_SELECTOR: &str = "img, picture source";

/// Attributes holding a single image URL (primary source plus lazy-loading aliases).
pub const SOURCE_ATTRIBUTES: &[&str] = &["src", "data-src", "data-lazy", "data-lazy-src"];

/// Attribute holding a responsive candidate list (`url descriptor, ...`).
pub const SRCSET_ATTRIBUTE: &str = "srcset";

/// Site-specific heuristics used to recognize listing photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePolicy {
    /// Substring the candidate URL's host must contain.
    pub cdn_host_fragment: String,
    /// Lowercase extensions (without dot) accepted as images.
    pub image_extensions: Vec<String>,
    /// Extension assigned to files whose URL has no known extension.
    pub fallback_extension: String,
    /// CSS selector matching image-bearing tags.
    pub image_tag_selector: String,
    /// Single-URL attributes inspected on each tag.
    pub source_attributes: Vec<String>,
    /// Responsive candidate list attribute.
    pub srcset_attribute: String,
    /// Referer header for image downloads.
    pub referer: String,
}

impl Default for SitePolicy {
    fn default() -> Self {
        Self {
            cdn_host_fragment: DEFAULT_CDN_HOST_FRAGMENT.to_string(),
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            fallback_extension: FALLBACK_EXTENSION.to_string(),
            image_tag_selector: IMAGE_TAG_SELECTOR.to_string(),
            source_attributes: SOURCE_ATTRIBUTES.iter().map(|a| (*a).to_string()).collect(),
            srcset_attribute: SRCSET_ATTRIBUTE.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

impl SitePolicy {
    /// Returns a copy of this policy matching a different CDN host fragment.
    #[must_use]
    pub fn with_cdn_host_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.cdn_host_fragment = fragment.into();
        self
    }

    /// Returns a copy of this policy sending a different referer.
    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }
}

/// Everything a single run needs besides the site policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Listing page to scan.
    pub page_url: String,
    /// Directory receiving `001.jpg`, `002.png`, ...
    pub output_dir: PathBuf,
    /// Maximum simultaneous image downloads.
    pub workers: usize,
    /// Persist a URL-to-filename manifest next to the images.
    pub write_manifest: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workers: DEFAULT_CONCURRENCY,
            write_manifest: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_policy_default_targets_booking_cdn() {
        let policy = SitePolicy::default();
        assert_eq!(policy.cdn_host_fragment, "bstatic.com");
        assert_eq!(policy.image_extensions, vec!["jpg", "jpeg", "png", "webp"]);
        assert_eq!(policy.fallback_extension, "jpg");
        assert_eq!(policy.referer, "https://www.booking.com/");
        assert!(policy.source_attributes.contains(&"data-lazy-src".to_string()));
    }

    #[test]
    fn test_site_policy_builders_override_fields() {
        let policy = SitePolicy::default()
            .with_cdn_host_fragment("127.0.0.1")
            .with_referer("http://127.0.0.1/");
        assert_eq!(policy.cdn_host_fragment, "127.0.0.1");
        assert_eq!(policy.referer, "http://127.0.0.1/");
        assert_eq!(policy.srcset_attribute, "srcset");
    }

    #[test]
    fn test_scrape_config_default_values() {
        let config = ScrapeConfig::default();
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.workers, 8);
        assert!(!config.write_manifest);
    }
}
