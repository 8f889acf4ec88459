//! Error types for the archive loader

use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The source identifier could not be parsed as an absolute URL.
    #[error("invalid archive URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure while fetching the archive bytes.
    #[error("transport error: {0}")]
    Client(#[from] ustar_client::Error),

    /// The fetched bytes did not decode as a tar archive.
    #[error("decode error: {0}")]
    Format(#[from] ustar::Error),

    /// A load this caller was queued behind failed. The initiating caller
    /// receives the typed `Client`/`Format` error; queued waiters receive
    /// this summary.
    #[error("archive load for {url} failed: {reason}")]
    LoadFailed { url: String, reason: String },
}
