//! Error types for the archive transport

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection-level failure: DNS, TLS, timeout, or a broken body stream.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. Not retried; there is
    /// no fallback behind a single archive URL.
    #[error("HTTP {status} when fetching archive: {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
}
