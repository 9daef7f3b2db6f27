//! Time-bounded in-memory cache for raw API responses
//!
//! Provides a `Cache` that memoizes response bodies by request URL. A single
//! background task sweeps the map every `interval` and drops entries older
//! than `interval`, so a stale entry lives at most two intervals.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Errors that can occur when constructing a cache
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The expiration interval must be greater than zero
    #[error("Invalid cache interval: {0:?} (must be greater than zero)")]
    InvalidInterval(Duration),
}

/// A single cached response body
#[derive(Debug)]
struct CacheEntry {
    /// When the entry was inserted
    created_at: Instant,
    /// The raw response body
    value: Bytes,
}

type Entries = Arc<Mutex<HashMap<String, CacheEntry>>>;

/// Locks the entry map, recovering the guard if a previous holder panicked.
///
/// The map holds no cross-entry invariants, so a poisoned lock is still
/// consistent enough to read and sweep.
fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Removes every entry older than `max_age` and returns how many were dropped.
fn sweep(entries: &Entries, max_age: Duration) -> usize {
    let now = Instant::now();
    let mut map = lock(entries);
    let before = map.len();
    map.retain(|_, entry| now.saturating_duration_since(entry.created_at) <= max_age);
    before - map.len()
}

/// Background reaper owned by the cache
#[derive(Debug)]
struct Reaper {
    /// Closing or signalling this channel stops the sweep loop
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Reaper {
    fn spawn(entries: Entries, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = sweep(&entries, interval);
                        if removed > 0 {
                            tracing::debug!(removed, "reaped expired cache entries");
                        }
                    }
                    // Fires on an explicit signal and when every sender is dropped
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("cache reaper stopping");
                        break;
                    }
                }
            }
        });

        Self { shutdown_tx, handle }
    }
}

/// Concurrency-safe response cache with age-based expiration
///
/// Keys are request URLs and values are raw response bodies. Re-adding a key
/// replaces its value and resets its age. Entries are removed only by the
/// background reaper, which runs from construction until [`Cache::shutdown`]
/// is called or the last clone of the cache is dropped.
///
/// Clones share the same entries and the same reaper.
#[derive(Debug, Clone)]
pub struct Cache {
    entries: Entries,
    interval: Duration,
    reaper: Arc<Reaper>,
}

impl Cache {
    /// Creates an empty cache and starts its reaper
    ///
    /// `interval` is both the maximum entry age and the sweep period. Must be
    /// called from within a tokio runtime.
    ///
    /// # Returns
    /// * `Ok(Cache)` with the reaper running
    /// * `Err(CacheError::InvalidInterval)` if `interval` is zero
    pub fn new(interval: Duration) -> Result<Self, CacheError> {
        if interval.is_zero() {
            return Err(CacheError::InvalidInterval(interval));
        }

        let entries: Entries = Arc::new(Mutex::new(HashMap::new()));
        let reaper = Reaper::spawn(Arc::clone(&entries), interval);

        Ok(Self {
            entries,
            interval,
            reaper: Arc::new(reaper),
        })
    }

    /// Inserts or replaces the value stored under `key`
    pub fn add(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        let entry = CacheEntry {
            created_at: Instant::now(),
            value: value.into(),
        };
        lock(&self.entries).insert(key.into(), entry);
    }

    /// Returns the value stored under `key`, or `None` on a miss
    ///
    /// The returned `Bytes` is an immutable snapshot; a later `add` for the
    /// same key does not affect it.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        lock(&self.entries)
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// Runs one sweep immediately, returning the number of entries removed
    ///
    /// An entry whose age equals the interval exactly is kept.
    pub fn reap_expired(&self) -> usize {
        sweep(&self.entries, self.interval)
    }

    /// The configured expiration interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of entries currently stored, including expired ones not yet reaped
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Signals the reaper to stop
    ///
    /// Waits for the reaper to exit only when called on the last clone;
    /// otherwise it returns right after signalling. Other clones keep their
    /// entries but no longer expire.
    pub async fn shutdown(self) {
        // Full channel means a stop signal is already pending
        let _ = self.reaper.shutdown_tx.try_send(());

        if let Ok(reaper) = Arc::try_unwrap(self.reaper) {
            if let Err(e) = reaper.handle.await {
                tracing::warn!(error = %e, "cache reaper exited abnormally");
            }
        }
    }

    #[cfg(test)]
    fn reaper_finished(&self) -> bool {
        self.reaper.handle.is_finished()
    }
}
