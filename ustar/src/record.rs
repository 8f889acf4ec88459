//! Immutable file records produced by the decoder.

use crate::Result;
use crate::codec::bytes_to_text;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// A single file entry decoded from an archive.
///
/// Records own their content: once decoding returns, the source buffer may
/// be dropped. Header bytes and block padding are never part of `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    name: String,
    modified_at: DateTime<Utc>,
    content: Vec<u8>,
}

impl FileRecord {
    pub(crate) fn new(name: String, modified_at: DateTime<Utc>, content: Vec<u8>) -> Self {
        Self {
            name,
            modified_at,
            content,
        }
    }

    /// Full path of the file inside the archive, trailing NUL fill stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last modification time, at second granularity.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Raw content bytes. The length equals the header's decoded size field
    /// exactly.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content interpreted as text through the byte-text codec.
    ///
    /// Bytes above the ASCII range come out shifted by the codec's fixed
    /// offset; see [`bytes_to_text`].
    pub fn content_text(&self) -> String {
        bytes_to_text(&self.content)
    }

    /// Content parsed as JSON, via the same text interpretation as
    /// [`content_text`](Self::content_text).
    pub fn content_json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.content_text())?)
    }
}
