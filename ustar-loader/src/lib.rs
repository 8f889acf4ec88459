//! # ustar-loader
//!
//! Caching loader for tar archives fetched over HTTP. Each archive is keyed
//! by its absolute URL; the first caller triggers one fetch-and-decode,
//! callers arriving while it is in flight wait on the same result, and
//! callers arriving afterwards resolve immediately from the cache.
//!
//! ```no_run
//! use ustar::FileFilter;
//! use ustar_loader::ArchiveLoader;
//!
//! # async fn run() -> Result<(), ustar_loader::Error> {
//! let loader = ArchiveLoader::new()?;
//! let archive = loader
//!     .get_or_load("https://example.com/assets/bundle.tar")
//!     .await?;
//! for record in archive.select(&FileFilter::All) {
//!     println!("{} ({} bytes)", record.name(), record.content().len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

pub use error::{Error, Result};
pub use loader::ArchiveLoader;
