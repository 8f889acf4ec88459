//! URL-keyed archive cache with in-flight de-duplication.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};
use url::Url;
use ustar::{Archive, FileFilter};
use ustar_client::ArchiveClient;

type LoadResult = Result<Arc<Archive>>;

/// Per-URL cache entry.
///
/// `Loading` holds the waiters queued behind the in-flight fetch, in arrival
/// order. A failed load removes the entry entirely, so the map never holds a
/// permanently loading state.
enum ArchiveState {
    Loading(Vec<oneshot::Sender<LoadResult>>),
    Loaded(Arc<Archive>),
}

/// Caching loader for tar archives, keyed by absolute URL.
///
/// For any given URL, fetch-and-decode runs at most once concurrently and
/// the decoder is invoked exactly once per successful fetch. The loader is
/// `Send + Sync`; clones of the returned [`Archive`] handles stay valid for
/// as long as the caller keeps them.
pub struct ArchiveLoader {
    client: ArchiveClient,
    archives: Mutex<HashMap<String, ArchiveState>>,
}

impl ArchiveLoader {
    /// Create a loader with a default [`ArchiveClient`].
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(ArchiveClient::new()?))
    }

    /// Create a loader around a configured client.
    pub fn with_client(client: ArchiveClient) -> Self {
        Self {
            client,
            archives: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the archive for `url`, fetching and decoding it on first use.
    ///
    /// The URL is normalized to its absolute form before keying, so spelling
    /// variants of the same resource share one cache entry. Callers arriving
    /// while a load is in flight are queued and woken in arrival order once
    /// decoding completes; callers arriving after completion resolve
    /// immediately.
    ///
    /// # Errors
    ///
    /// Transport and decode failures propagate to every caller of the failed
    /// load (the initiator gets the typed error, queued waiters get
    /// [`Error::LoadFailed`]), and the entry is dropped so a later call can
    /// start a fresh load.
    pub async fn get_or_load(&self, url: &str) -> LoadResult {
        let key = normalize(url)?;

        let waiter = {
            let mut archives = self.archives.lock();
            match archives.get_mut(&key) {
                Some(ArchiveState::Loaded(archive)) => {
                    trace!(url = %key, "archive cache hit");
                    return Ok(Arc::clone(archive));
                }
                Some(ArchiveState::Loading(waiters)) => {
                    trace!(url = %key, queued = waiters.len(), "archive load in flight, queueing");
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    archives.insert(key.clone(), ArchiveState::Loading(Vec::new()));
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            return rx.await.unwrap_or_else(|_| {
                Err(Error::LoadFailed {
                    url: key,
                    reason: "loading task dropped before completion".to_string(),
                })
            });
        }

        // If this future is dropped mid-fetch (aborted task, timeout
        // wrapper), the guard removes the Loading entry and fails its
        // waiters instead of leaving them queued behind a load that will
        // never finish.
        let mut guard = LoadGuard {
            loader: self,
            key: &key,
            armed: true,
        };
        let result = self.fetch_and_decode(&key).await;
        guard.armed = false;
        self.finish_load(&key, result)
    }

    /// Modification times of the records matching `filter`, in archive
    /// order. Loads the archive first if needed.
    pub async fn get_time(&self, url: &str, filter: &FileFilter) -> Result<Vec<DateTime<Utc>>> {
        let archive = self.get_or_load(url).await?;
        Ok(archive
            .select(filter)
            .into_iter()
            .map(ustar::FileRecord::modified_at)
            .collect())
    }

    /// Whether `url` is already decoded and cached.
    pub fn is_loaded(&self, url: &str) -> bool {
        normalize(url).is_ok_and(|key| {
            matches!(self.archives.lock().get(&key), Some(ArchiveState::Loaded(_)))
        })
    }

    async fn fetch_and_decode(&self, url: &str) -> Result<Archive> {
        let bytes = self.client.download(url).await?;
        debug!(url, len = bytes.len(), "decoding fetched archive");
        Ok(ustar::decode(&bytes)?)
    }

    /// Publishes the load result: stores the archive (or drops the entry on
    /// failure) and wakes every queued waiter in arrival order.
    fn finish_load(&self, key: &str, result: Result<Archive>) -> LoadResult {
        let mut archives = self.archives.lock();
        let waiters = match archives.remove(key) {
            Some(ArchiveState::Loading(waiters)) => waiters,
            _ => Vec::new(),
        };

        match result {
            Ok(archive) => {
                let archive = Arc::new(archive);
                archives.insert(key.to_string(), ArchiveState::Loaded(Arc::clone(&archive)));
                drop(archives);
                for tx in waiters {
                    let _ = tx.send(Ok(Arc::clone(&archive)));
                }
                Ok(archive)
            }
            Err(err) => {
                drop(archives);
                warn!(url = key, error = %err, "archive load failed");
                for tx in waiters {
                    let _ = tx.send(Err(Error::LoadFailed {
                        url: key.to_string(),
                        reason: err.to_string(),
                    }));
                }
                Err(err)
            }
        }
    }
}

/// Cleans up after an initiating caller that was cancelled before
/// [`ArchiveLoader::finish_load`] ran.
///
/// Armed for the duration of the fetch; disarmed once the result is handed
/// to `finish_load`. On a cancelled drop it removes the `Loading` entry and
/// resolves every queued waiter with an error, so the entry can never wedge.
struct LoadGuard<'a> {
    loader: &'a ArchiveLoader,
    key: &'a str,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let waiters = {
            let mut archives = self.loader.archives.lock();
            match archives.remove(self.key) {
                Some(ArchiveState::Loading(waiters)) => waiters,
                _ => Vec::new(),
            }
        };
        warn!(
            url = self.key,
            waiters = waiters.len(),
            "archive load cancelled before completion"
        );
        for tx in waiters {
            let _ = tx.send(Err(Error::LoadFailed {
                url: self.key.to_string(),
                reason: "load cancelled before completion".to_string(),
            }));
        }
    }
}

/// Normalizes a source identifier to its absolute URL string.
fn normalize(url: &str) -> Result<String> {
    Ok(Url::parse(url)?.to_string())
}
