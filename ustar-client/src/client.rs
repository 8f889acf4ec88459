//! HTTP client for downloading archive bytes

use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default request timeout
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Client for fetching tar resources over HTTP.
///
/// Wraps a pooled [`reqwest::Client`]; cloning is cheap and shares the pool.
/// Transparent gzip/deflate decompression is enabled, so the bytes handed to
/// the decoder are the archive itself regardless of transfer encoding.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
}

impl ArchiveClient {
    /// Create a new client with default timeouts.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client around an existing [`reqwest::Client`].
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> ArchiveClientBuilder {
        ArchiveClientBuilder::new()
    }

    /// Downloads the full body of `url` into memory.
    ///
    /// No streaming and no retries: a non-2xx status fails immediately with
    /// [`Error::HttpStatus`], and connection-level failures map to
    /// [`Error::Http`].
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        trace!(url, "fetching archive");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "archive fetch failed");
            return Err(Error::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!(url, len = body.len(), "archive fetched");
        Ok(body.to_vec())
    }
}

/// Builder for [`ArchiveClient`]
#[derive(Debug, Clone)]
pub struct ArchiveClientBuilder {
    connect_timeout: Duration,
    request_timeout: Duration,
    user_agent: Option<String>,
}

impl ArchiveClientBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
        }
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the total request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set a custom user agent string
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ArchiveClient> {
        let mut builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .gzip(true)
            .deflate(true);

        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(ArchiveClient {
            client: builder.build()?,
        })
    }
}

impl Default for ArchiveClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
