//! HTTP client wrapper shared by the page fetch and every image download.
//!
//! This module provides the `HttpClient` struct which owns the connection
//! pool and cookie store, and streams image bodies to disk.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::HeaderMap;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::WRITE_CHUNK_SIZE;
use super::error::DownloadError;

/// HTTP client for the page fetch and image downloads.
///
/// Create it once per run and clone it into download tasks: clones share
/// the same connection pool and cookie store, so cookies set by the listing
/// page are sent with the image requests, as a browser session would.
///
/// # Example
///
/// ```no_run
/// use listing_photos_core::download::HttpClient;
/// use listing_photos_core::user_agent::image_headers;
/// use std::path::Path;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::try_new()?;
/// let bytes = client
///     .download_to_path(
///         "https://cf.bstatic.com/xdata/images/hotel/1.jpg",
///         Path::new("./photos/001.jpg"),
///         image_headers("https://www.booking.com/"),
///         Duration::from_secs(30),
///     )
///     .await?;
/// println!("saved {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with a cookie store and gzip decoding.
    ///
    /// Timeouts are applied per request, since the page fetch and image
    /// downloads use different limits.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialized.
    pub fn try_new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().cookie_store(true).gzip(true).build()?;
        Ok(Self { client })
    }

    /// Streams `url` into the file at `path`, returning the bytes written.
    ///
    /// The body is written through a 64 KiB buffer so memory stays bounded
    /// for large images. If the transfer or write fails after the file was
    /// created, the partial file is removed.
    ///
    /// `read_timeout` bounds each wait on the server (connect plus response
    /// head, then every body read), not the transfer as a whole: a large
    /// image that keeps arriving is never cut off.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails or the server stalls longer than `read_timeout`
    /// - The server returns a non-2xx status
    /// - Creating or writing the file fails
    #[instrument(skip(self, headers), fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        path: &Path,
        headers: HeaderMap,
        read_timeout: Duration,
    ) -> Result<u64, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let request = self.client.get(url).headers(headers).send();
        let response = tokio::time::timeout(read_timeout, request)
            .await
            .map_err(|_| DownloadError::timeout(url))?
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let mut file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let result = stream_to_file(&mut file, response, read_timeout, url, path).await;
        if result.is_err() {
            debug!("removing partial file after failed download");
            drop(file);
            let _ = tokio::fs::remove_file(path).await;
        }

        let bytes = result?;
        debug!(bytes, "image saved");
        Ok(bytes)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Streams response body to file, returning bytes written.
///
/// Each chunk must arrive within `read_timeout` of the previous one.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    read_timeout: Duration,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(WRITE_CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    loop {
        let next = tokio::time::timeout(read_timeout, stream.next())
            .await
            .map_err(|_| DownloadError::timeout(url))?;
        let Some(chunk_result) = next else {
            break;
        };
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}
