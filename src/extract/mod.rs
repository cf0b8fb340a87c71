//! Image URL extraction from listing page markup.
//!
//! Listing pages reference photos inconsistently: plain `src`, lazy-loading
//! aliases, responsive `srcset` lists, and URLs buried in inline scripts or
//! JSON blobs. Extraction combines two passes:
//!
//! 1. Tag pass: every image-bearing tag's source attributes and `srcset`
//!    entries, with protocol-relative URLs rewritten to `https:`.
//! 2. Raw pass: a regex over the whole markup for absolute URLs on the CDN.
//!
//! Every candidate also contributes its query-stripped form, since the CDN
//! tends to serve its default (larger) rendition without resize parameters.
//! The union is filtered to CDN hosts with an image extension and returned
//! sorted, so identical markup always yields identical output.
//!
//! # Example
//!
//! ```
//! use listing_photos_core::config::SitePolicy;
//! use listing_photos_core::extract::extract_image_urls;
//!
//! let html = r#"<img src="//cf.bstatic.com/xdata/images/hotel/1.jpg?k=abc">"#;
//! let urls = extract_image_urls(html, &SitePolicy::default()).unwrap();
//! assert_eq!(
//!     urls,
//!     vec![
//!         "https://cf.bstatic.com/xdata/images/hotel/1.jpg",
//!         "https://cf.bstatic.com/xdata/images/hotel/1.jpg?k=abc",
//!     ]
//! );
//! ```

mod candidate;
mod error;

pub use error::ExtractError;

use std::collections::BTreeSet;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument, trace};

use crate::config::SitePolicy;
use candidate::{absolutize, host_contains, srcset_urls, strip_query};

/// Compiled form of a [`SitePolicy`] ready to scan markup.
#[derive(Debug)]
pub struct ImageExtractor {
    selector: Selector,
    source_attributes: Vec<String>,
    srcset_attribute: String,
    cdn_host_fragment: String,
    cdn_url_pattern: Regex,
    extension_pattern: Regex,
}

impl ImageExtractor {
    /// Compiles the selector and patterns described by `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the selector is not valid CSS, the policy
    /// has no extensions, or a derived pattern fails to compile.
    pub fn new(policy: &SitePolicy) -> Result<Self, ExtractError> {
        let selector = Selector::parse(&policy.image_tag_selector).map_err(|e| {
            ExtractError::InvalidSelector {
                selector: policy.image_tag_selector.clone(),
                reason: e.to_string(),
            }
        })?;

        let cdn_url_pattern = Regex::new(&format!(
            r#"https?://[^\s"']*{}[^\s"']+"#,
            regex::escape(&policy.cdn_host_fragment)
        ))
        .map_err(|e| ExtractError::pattern("cdn url", &e))?;

        Ok(Self {
            selector,
            source_attributes: policy.source_attributes.clone(),
            srcset_attribute: policy.srcset_attribute.clone(),
            cdn_host_fragment: policy.cdn_host_fragment.clone(),
            cdn_url_pattern,
            extension_pattern: extension_pattern(&policy.image_extensions)?,
        })
    }

    /// Returns the sorted, deduplicated image URLs found in `html`.
    ///
    /// An empty result means the page holds no recognizable photos; callers
    /// treat that as "nothing found", not as a failure.
    #[must_use]
    #[instrument(level = "debug", skip(self, html), fields(html_len = html.len()))]
    pub fn extract(&self, html: &str) -> Vec<String> {
        let mut candidates = self.tag_candidates(html);
        let tag_count = candidates.len();

        for found in self.cdn_url_pattern.find_iter(html) {
            candidates.insert(found.as_str().to_string());
        }
        debug!(
            tag_candidates = tag_count,
            total_candidates = candidates.len(),
            "collected image candidates"
        );

        let mut expanded = BTreeSet::new();
        for url in candidates {
            if let Some(base) = strip_query(&url) {
                expanded.insert(base.to_string());
            }
            expanded.insert(url);
        }

        let urls: Vec<String> = expanded
            .into_iter()
            .filter(|url| self.extension_pattern.is_match(url))
            .filter(|url| host_contains(url, &self.cdn_host_fragment))
            .collect();
        debug!(images = urls.len(), "filtered image urls");
        urls
    }

    fn tag_candidates(&self, html: &str) -> BTreeSet<String> {
        let document = Html::parse_document(html);
        let mut found = BTreeSet::new();

        for element in document.select(&self.selector) {
            let element = element.value();
            let single = self
                .source_attributes
                .iter()
                .filter_map(|attr| element.attr(attr));
            let responsive = element
                .attr(&self.srcset_attribute)
                .into_iter()
                .flat_map(srcset_urls);

            for raw in single.chain(responsive) {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                let url = absolutize(raw);
                if host_contains(&url, &self.cdn_host_fragment) {
                    trace!(url = %url, "tag candidate");
                    found.insert(url);
                }
            }
        }

        found
    }
}

/// Builds the case-insensitive "ends with an image extension, optionally
/// followed by a query" pattern.
fn extension_pattern(extensions: &[String]) -> Result<Regex, ExtractError> {
    if extensions.is_empty() {
        return Err(ExtractError::NoExtensions);
    }
    let alternation = extensions
        .iter()
        .map(|ext| regex::escape(ext.trim_start_matches('.')))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\.(?:{alternation})(?:$|\?)"))
        .map_err(|e| ExtractError::pattern("extension", &e))
}

/// Extracts image URLs from `html` using `policy`.
///
/// Convenience wrapper around [`ImageExtractor::new`] + [`ImageExtractor::extract`].
///
/// # Errors
///
/// Returns [`ExtractError`] if `policy` cannot be compiled.
pub fn extract_image_urls(html: &str, policy: &SitePolicy) -> Result<Vec<String>, ExtractError> {
    Ok(ImageExtractor::new(policy)?.extract(html))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<String> {
        extract_image_urls(html, &SitePolicy::default()).unwrap()
    }

    fn assert_sorted_unique(urls: &[String]) {
        for pair in urls.windows(2) {
            assert!(pair[0] < pair[1], "not sorted/unique: {urls:?}");
        }
    }

    #[test]
    fn test_protocol_relative_src_becomes_https() {
        let urls = extract(r#"<img src="//cdn.example.bstatic.com/a.jpg">"#);
        assert_eq!(urls, vec!["https://cdn.example.bstatic.com/a.jpg"]);
    }

    #[test]
    fn test_query_string_yields_both_variants() {
        let urls = extract(r#"<img src="https://x.bstatic.com/img.jpg?k=300">"#);
        assert_eq!(
            urls,
            vec![
                "https://x.bstatic.com/img.jpg",
                "https://x.bstatic.com/img.jpg?k=300"
            ]
        );
    }

    #[test]
    fn test_lazy_loading_attributes_are_collected() {
        let html = r#"
            <img data-src="https://a.bstatic.com/1.jpg">
            <img data-lazy="https://a.bstatic.com/2.png">
            <img data-lazy-src="https://a.bstatic.com/3.webp">
        "#;
        let urls = extract(html);
        assert_eq!(
            urls,
            vec![
                "https://a.bstatic.com/1.jpg",
                "https://a.bstatic.com/2.png",
                "https://a.bstatic.com/3.webp"
            ]
        );
    }

    #[test]
    fn test_srcset_entries_are_collected() {
        let html = r#"<img srcset="//a.bstatic.com/s.jpg 1x, //a.bstatic.com/l.jpg 2x, //a.bstatic.com/bare.jpeg">"#;
        let urls = extract(html);
        assert_eq!(
            urls,
            vec![
                "https://a.bstatic.com/bare.jpeg",
                "https://a.bstatic.com/l.jpg",
                "https://a.bstatic.com/s.jpg"
            ]
        );
    }

    #[test]
    fn test_picture_source_srcset_is_collected() {
        let html = r#"<picture><source srcset="https://a.bstatic.com/p.webp 800w"><img src="/local.png"></picture>"#;
        assert_eq!(extract(html), vec!["https://a.bstatic.com/p.webp"]);
    }

    #[test]
    fn test_non_cdn_and_empty_attributes_are_skipped() {
        let html = r#"
            <img src="">
            <img src="   ">
            <img src="https://tracker.example.com/pixel.png">
            <img src="/static/icon.png">
        "#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_regex_fallback_finds_urls_in_scripts() {
        let html = r#"<script>window.gallery = {"photos":["https://cf.bstatic.com/xdata/images/hotel/max1024x768/42.jpg?k=abc&o="]};</script>"#;
        let urls = extract(html);
        assert_eq!(
            urls,
            vec![
                "https://cf.bstatic.com/xdata/images/hotel/max1024x768/42.jpg",
                "https://cf.bstatic.com/xdata/images/hotel/max1024x768/42.jpg?k=abc&o="
            ]
        );
    }

    #[test]
    fn test_extension_filter_is_case_insensitive_and_rejects_others() {
        let html = r#"
            <img src="https://a.bstatic.com/UPPER.JPG">
            <img src="https://a.bstatic.com/static/css/site.css">
            <img src="https://a.bstatic.com/icon.svg">
            <img src="https://a.bstatic.com/photo.jpg.html">
        "#;
        assert_eq!(extract(html), vec!["https://a.bstatic.com/UPPER.JPG"]);
    }

    #[test]
    fn test_regex_match_with_foreign_host_is_rejected() {
        let html = r#"<a href="https://redirect.example.com/?to=cf.bstatic.com/a.jpg">x</a>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_output_sorted_unique_and_filtered() {
        let html = r#"
            <img src="https://b.bstatic.com/2.jpg?k=1">
            <img src="https://a.bstatic.com/1.jpg">
            <img data-src="https://a.bstatic.com/1.jpg">
            <script>"https://b.bstatic.com/2.jpg?k=1"</script>
            <img src="https://a.bstatic.com/readme.txt">
        "#;
        let urls = extract(html);
        assert_sorted_unique(&urls);
        assert_eq!(urls.len(), 3);
        let policy = SitePolicy::default();
        let pattern = extension_pattern(&policy.image_extensions).unwrap();
        for url in &urls {
            assert!(pattern.is_match(url), "extension filter: {url}");
            assert!(host_contains(url, "bstatic.com"), "host filter: {url}");
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"
            <img src="//z.bstatic.com/9.jpg?s=1" srcset="//y.bstatic.com/8.png 1x, //x.bstatic.com/7.webp 2x">
            <script>["https://w.bstatic.com/6.jpeg?x=2", "https://v.bstatic.com/5.jpg"]</script>
        "#;
        let first = extract(html);
        let second = extract(html);
        assert_eq!(first, second);
        assert_sorted_unique(&first);
    }

    #[test]
    fn test_no_matches_returns_empty() {
        assert!(extract("<html><body><p>No photos here</p></body></html>").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_custom_policy_fragment() {
        let policy = SitePolicy::default().with_cdn_host_fragment("images.example.org");
        let html = r#"<img src="https://images.example.org/a.png"><img src="https://cf.bstatic.com/b.jpg">"#;
        let urls = extract_image_urls(html, &policy).unwrap();
        assert_eq!(urls, vec!["https://images.example.org/a.png"]);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let policy = SitePolicy {
            image_tag_selector: "img[".to_string(),
            ..SitePolicy::default()
        };
        assert!(matches!(
            ImageExtractor::new(&policy),
            Err(ExtractError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_empty_extension_list_is_rejected() {
        let policy = SitePolicy {
            image_extensions: Vec::new(),
            ..SitePolicy::default()
        };
        assert!(matches!(
            ImageExtractor::new(&policy),
            Err(ExtractError::NoExtensions)
        ));
    }
}
