//! Listing page fetch.
//!
//! One GET with browser headers. The 45 second timeout bounds each wait on
//! the server (connect plus response head, then every body read). Any
//! failure here ends the run, since nothing can be extracted without the
//! markup. The body is decoded as UTF-8, with invalid sequences replaced.

mod error;

pub use error::FetchError;

use std::time::Duration;

use futures_util::StreamExt;
use tracing::{debug, info, instrument};
use url::Url;

use crate::download::HttpClient;
use crate::download::constants::PAGE_TIMEOUT_SECS;
use crate::user_agent::page_headers;

/// Fetches listing page markup.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: HttpClient,
    timeout: Duration,
}

impl PageFetcher {
    /// Creates a fetcher sharing `client`'s connection pool and cookies.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(PAGE_TIMEOUT_SECS),
        }
    }

    /// Overrides the page timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the page timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches `url` and returns the decoded body text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for an invalid URL, a network failure or
    /// timeout, a non-2xx status, or an unreadable body.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let request = self
            .client
            .inner()
            .get(parsed)
            .headers(page_headers())
            .send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        debug!(status = status.as_u16(), "page response received");

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        loop {
            let next = tokio::time::timeout(self.timeout, stream.next())
                .await
                .map_err(|_| FetchError::Timeout {
                    url: url.to_string(),
                })?;
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;
            body.extend_from_slice(&chunk);
        }
        let html = String::from_utf8_lossy(&body).into_owned();

        info!(bytes = html.len(), "page fetched");
        Ok(html)
    }
}
