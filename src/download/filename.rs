//! Index-based output filenames.
//!
//! Files are named by their position in the sorted URL list, never by the
//! URL itself, so two images can never collide and the name carries no
//! hostile path components.

use std::path::{Path, PathBuf};

use url::Url;

/// Returns the lowercase image extension of `url`'s path, if it is one of
/// `extensions` (compared case-insensitively).
///
/// Only the path is inspected; an extension inside the query string does
/// not count.
#[must_use]
pub fn image_extension_from_url(url: &str, extensions: &[String]) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path().to_ascii_lowercase();
    extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .find(|ext| {
            path.strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
}

/// Builds the `{index:03}.{ext}` filename for the `index`-th (1-based) URL.
#[must_use]
pub fn indexed_filename(index: usize, url: &str, extensions: &[String], fallback: &str) -> String {
    let ext = image_extension_from_url(url, extensions).unwrap_or_else(|| fallback.to_string());
    format!("{index:03}.{ext}")
}

/// Joins [`indexed_filename`] onto `output_dir`.
#[must_use]
pub fn indexed_path(
    output_dir: &Path,
    index: usize,
    url: &str,
    extensions: &[String],
    fallback: &str,
) -> PathBuf {
    output_dir.join(indexed_filename(index, url, extensions, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        ["jpg", "jpeg", "png", "webp"]
            .iter()
            .map(|e| (*e).to_string())
            .collect()
    }

    #[test]
    fn test_indexed_filename_zero_pads_to_three_digits() {
        assert_eq!(
            indexed_filename(1, "https://a.bstatic.com/x.jpg", &exts(), "jpg"),
            "001.jpg"
        );
        assert_eq!(
            indexed_filename(42, "https://a.bstatic.com/x.png", &exts(), "jpg"),
            "042.png"
        );
        assert_eq!(
            indexed_filename(1234, "https://a.bstatic.com/x.webp", &exts(), "jpg"),
            "1234.webp"
        );
    }

    #[test]
    fn test_extension_lowercased() {
        assert_eq!(
            image_extension_from_url("https://a.bstatic.com/PHOTO.JPEG", &exts()),
            Some("jpeg".to_string())
        );
    }

    #[test]
    fn test_extension_ignores_query() {
        assert_eq!(
            image_extension_from_url("https://a.bstatic.com/img.png?k=300&fmt=.webp", &exts()),
            Some("png".to_string())
        );
        assert_eq!(
            image_extension_from_url("https://a.bstatic.com/img?fmt=photo.webp", &exts()),
            None
        );
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(
            indexed_filename(3, "https://a.bstatic.com/img.gif", &exts(), "jpg"),
            "003.jpg"
        );
        assert_eq!(
            indexed_filename(4, "https://a.bstatic.com/", &exts(), "jpg"),
            "004.jpg"
        );
        assert_eq!(indexed_filename(5, "not a url", &exts(), "jpg"), "005.jpg");
    }

    #[test]
    fn test_extension_requires_dot() {
        assert_eq!(
            image_extension_from_url("https://a.bstatic.com/notjpg", &exts()),
            None
        );
    }

    #[test]
    fn test_indexed_path_joins_output_dir() {
        let path = indexed_path(
            Path::new("/tmp/out"),
            7,
            "https://a.bstatic.com/x.webp",
            &exts(),
            "jpg",
        );
        assert_eq!(path, PathBuf::from("/tmp/out/007.webp"));
    }
}
