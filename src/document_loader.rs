//! Document retrieval by locator: `http(s)` URLs over HTTP, `file://` URLs
//! and bare paths from disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::http_client::{AsyncHttpClient, HttpClientConfig};

/// Where a document lives
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    Local(PathBuf),
    Remote(String),
}

impl DocumentSource {
    /// Classify a locator as a remote URL or a local path
    ///
    /// `http://` and `https://` locators are remote; `file://` URLs and bare
    /// paths are local.
    pub fn parse(locator: &str) -> Result<Self> {
        let trimmed = locator.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidLocator {
                locator: locator.to_string(),
            });
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(DocumentSource::Remote(trimmed.to_string()));
        }

        if let Some(path) = trimmed.strip_prefix("file://") {
            if path.is_empty() {
                return Err(Error::InvalidLocator {
                    locator: locator.to_string(),
                });
            }
            return Ok(DocumentSource::Local(PathBuf::from(path)));
        }

        Ok(DocumentSource::Local(PathBuf::from(trimmed)))
    }
}

/// Capability to retrieve the raw bytes of a document by locator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>>;
}

/// Fetches remote documents over HTTP and local documents from disk
pub struct SourceLoader {
    http_client: AsyncHttpClient,
}

impl SourceLoader {
    pub fn new(http_client: AsyncHttpClient) -> Self {
        Self { http_client }
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(AsyncHttpClient::new(config)?))
    }

    /// Load a document by classified source
    pub async fn load(&self, source: &DocumentSource) -> Result<Vec<u8>> {
        match source {
            DocumentSource::Local(path) => self.load_local(path).await,
            DocumentSource::Remote(url) => self.http_client.download(url).await,
        }
    }

    async fn load_local(&self, path: &Path) -> Result<Vec<u8>> {
        let data = tokio::fs::read(path).await.map_err(|source| Error::LocalRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read local document");
        Ok(data)
    }
}

#[async_trait]
impl DocumentFetcher for SourceLoader {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        let source = DocumentSource::parse(locator)?;
        self.load(&source).await
    }
}
