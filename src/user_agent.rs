//! Browser-identifying request headers for page and image traffic.
//!
//! Listing sites serve a stripped page (or nothing) to obvious bots, so both
//! the page fetch and the image downloads present as a desktop browser.

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, REFERER, USER_AGENT,
};
use tracing::warn;

/// Desktop Chrome User-Agent sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

/// `Accept` value favoring HTML documents.
pub const PAGE_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// `Accept` value favoring image formats.
pub const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// `Accept-Language` value sent with every request.
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9,sr;q=0.8";

fn browser_headers(accept: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(accept));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
    );
    headers
}

/// Headers for the listing page request.
#[must_use]
pub fn page_headers() -> HeaderMap {
    let mut headers = browser_headers(PAGE_ACCEPT);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Headers for an image request carrying `referer`.
///
/// A referer that is not a valid header value is dropped with a warning
/// rather than failing the download.
#[must_use]
pub fn image_headers(referer: &str) -> HeaderMap {
    let mut headers = browser_headers(IMAGE_ACCEPT);
    match HeaderValue::from_str(referer) {
        Ok(value) => {
            headers.insert(REFERER, value);
        }
        Err(e) => warn!(referer, error = %e, "ignoring invalid referer header value"),
    }
    headers
}
