//! # ustar-client
//!
//! HTTP transport for tar archives: fetches the complete resource body into
//! memory so the decoder can run over a full buffer. There is no streaming
//! decode and no retry policy; a non-success response is surfaced as a hard
//! error for the caller to handle.

pub mod client;
pub mod error;

pub use client::{ArchiveClient, ArchiveClientBuilder};
pub use error::{Error, Result};
