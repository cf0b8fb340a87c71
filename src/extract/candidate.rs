//! Candidate URL clean-up helpers shared by the tag and raw-markup passes.

use url::Url;

/// Returns the URL tokens of a responsive `srcset` list.
///
/// Each comma-separated entry contributes its first whitespace-delimited
/// token; entries missing a descriptor still contribute their URL.
pub(crate) fn srcset_urls(srcset: &str) -> impl Iterator<Item = &str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
}

/// Rewrites a protocol-relative URL (`//host/path`) to `https://host/path`.
pub(crate) fn absolutize(candidate: &str) -> String {
    if candidate.starts_with("//") {
        format!("https:{candidate}")
    } else {
        candidate.to_string()
    }
}

/// Returns the part of `url` before the first `?`, when it has a query.
pub(crate) fn strip_query(url: &str) -> Option<&str> {
    url.split_once('?').map(|(base, _)| base)
}

/// True when `url` parses with a host containing `fragment` (case-insensitive).
pub(crate) fn host_contains(url: &str, fragment: &str) -> bool {
    let fragment = fragment.to_ascii_lowercase();
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host.contains(&fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srcset_urls_takes_url_token_of_each_entry() {
        let urls: Vec<&str> =
            srcset_urls("https://a.bstatic.com/1.jpg 1x, https://a.bstatic.com/2.jpg 2x").collect();
        assert_eq!(
            urls,
            vec!["https://a.bstatic.com/1.jpg", "https://a.bstatic.com/2.jpg"]
        );
    }

    #[test]
    fn test_srcset_urls_keeps_entry_without_descriptor() {
        let urls: Vec<&str> = srcset_urls("//a.bstatic.com/1.jpg, //a.bstatic.com/2.jpg 640w").collect();
        assert_eq!(urls, vec!["//a.bstatic.com/1.jpg", "//a.bstatic.com/2.jpg"]);
    }

    #[test]
    fn test_srcset_urls_skips_empty_entries() {
        let urls: Vec<&str> = srcset_urls(" , https://a.bstatic.com/1.jpg 1x,,\n").collect();
        assert_eq!(urls, vec!["https://a.bstatic.com/1.jpg"]);
    }

    #[test]
    fn test_absolutize_protocol_relative() {
        assert_eq!(
            absolutize("//cf.bstatic.com/a.jpg"),
            "https://cf.bstatic.com/a.jpg"
        );
        assert_eq!(
            absolutize("http://cf.bstatic.com/a.jpg"),
            "http://cf.bstatic.com/a.jpg"
        );
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://x.bstatic.com/img.jpg?k=300&o="),
            Some("https://x.bstatic.com/img.jpg")
        );
        assert_eq!(strip_query("https://x.bstatic.com/img.jpg"), None);
    }

    #[test]
    fn test_host_contains_checks_host_not_path() {
        assert!(host_contains("https://cf.bstatic.com/a.jpg", "bstatic.com"));
        assert!(host_contains("https://CF.BSTATIC.COM/a.jpg", "bstatic.com"));
        assert!(!host_contains(
            "https://tracker.example.com/p?u=bstatic.com/a.jpg",
            "bstatic.com"
        ));
        assert!(!host_contains("/images/a.jpg", "bstatic.com"));
    }
}
