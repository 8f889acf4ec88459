//! # ustar
//!
//! Decoder for USTAR tar archives, turning an in-memory byte buffer into an
//! ordered sequence of immutable file records with filtering accessors.
//!
//! The decoder is a pure, synchronous, single-pass function: it only reads
//! its input and allocates owned output, so it is safe to call concurrently
//! on independent buffers. There is no support for writing archives, for the
//! PAX/GNU long-name extensions, for sparse files, or for checksum
//! verification.
//!
//! ## Quick Start
//!
//! ```rust
//! use ustar::{FileFilter, decode};
//!
//! // Two NUL blocks are a valid, empty archive.
//! let buf = vec![0u8; 1024];
//! let archive = decode(&buf)?;
//! assert!(archive.is_empty());
//! assert!(archive.select(&FileFilter::All).is_empty());
//! # Ok::<(), ustar::Error>(())
//! ```
//!
//! Decoded records own their content. The input buffer can be dropped as
//! soon as [`decode`] returns.

pub mod archive;
pub mod codec;
pub mod decoder;
pub mod error;
pub mod filter;
pub mod record;

pub use archive::Archive;
pub use codec::bytes_to_text;
pub use decoder::decode;
pub use error::{Error, Result};
pub use filter::FileFilter;
pub use record::FileRecord;

/// Size of a tar header/content block in bytes.
pub const BLOCK_SIZE: usize = 512;
