//! Error types for the ustar crate

use thiserror::Error;

/// Result type for ustar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding an archive buffer.
///
/// Any error aborts the whole decode; no partial record list is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A numeric header field still contains non-octal characters after
    /// NUL/whitespace stripping.
    #[error("malformed {field} field in header at offset {offset}: {value:?}")]
    MalformedHeader {
        field: &'static str,
        offset: usize,
        value: String,
    },

    /// A header block or content range extends past the end of the buffer.
    #[error("range {start}..{end} is out of bounds for a {len}-byte buffer")]
    OutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    /// JSON deserialization of a record's content failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
