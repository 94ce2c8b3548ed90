//! HTTP download of remote documents

use crate::error::Error;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::timeout;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("hotel-xml/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Async HTTP client for downloading remote documents
///
/// One GET per call: no retries and no caching.
pub struct AsyncHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl AsyncHttpClient {
    /// Create a new async HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::from)?;

        Ok(Self { client, config })
    }

    /// Download the body at `url`, failing on any non-2xx status
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, Error> {
        let response = self.make_request(url).await?;
        let response = Self::check_status(url, response)?;

        let bytes = response.bytes().await.map_err(Error::from)?;
        tracing::debug!(url, bytes = bytes.len(), "downloaded document");
        Ok(bytes.to_vec())
    }

    fn check_status(url: &str, response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
        })
    }

    /// Make a single HTTP request with timeout
    async fn make_request(&self, url: &str) -> Result<Response, Error> {
        let request_future = self.client.get(url).send();

        timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request_future,
        )
        .await
        .map_err(|_| Error::Timeout {
            url: url.to_string(),
            timeout_seconds: self.config.timeout_seconds,
        })?
        .map_err(Error::from)
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
