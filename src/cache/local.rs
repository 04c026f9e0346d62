//! Thread-safe cache handle.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::{CacheItem, CacheStats, CacheStore, DumpEntry, Ttl};
use crate::config::StorageConfig;
use crate::error::Result;
use crate::tasks::Sweeper;

// == Local Cache ==
/// Shareable cache handle.
///
/// All operations go through one exclusive lock around the [`CacheStore`], which
/// the background sweeper (if any) also takes for each sweep. Wrap the handle in an
/// `Arc` to share it between threads. Dropping the handle stops the sweeper.
#[derive(Debug)]
pub struct LocalCache {
    store: Arc<Mutex<CacheStore>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl LocalCache {
    // == Constructor ==
    /// Builds a cache from `config`.
    ///
    /// A sweeper is started when both the cleanup interval and the default TTL
    /// are positive.
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(Mutex::new(CacheStore::from_config(&config)));

        let sweeper = match config.cleanup_interval {
            Some(interval) if config.sweeper_enabled() => {
                Some(Sweeper::start(store.clone(), interval)?)
            }
            _ => {
                info!(
                    cleanup_interval = ?config.cleanup_interval,
                    default_ttl = ?config.default_ttl,
                    "background sweeper not started: entries only expire lazily"
                );
                None
            }
        };

        Ok(Self {
            store,
            sweeper: Mutex::new(sweeper),
        })
    }

    /// Builds a cache from environment variables, see [`StorageConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(StorageConfig::from_env()?)
    }

    // == Set ==
    /// Stores a value, see [`CacheStore::set`].
    ///
    /// Returns `true` if an existing key was updated.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>, ttl: Ttl) -> bool {
        self.store.lock().set(key, value, ttl)
    }

    /// Sets `key` using the default TTL.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> bool {
        self.set(key, value, Ttl::Default)
    }

    // == Get ==
    /// Reads a snapshot of `key`, see [`CacheStore::get`].
    ///
    /// Expired entries are removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<CacheItem> {
        self.store.lock().get(key)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one was present.
    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    // == Clear ==
    /// Removes every entry. Safe on an empty cache.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    // == Cleanup Expired ==
    /// Removes every expired entry now; returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.store.lock().cleanup_expired()
    }

    // == Introspection ==
    /// Returns the current number of entries, expired ones not yet removed included.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Maximum number of entries the cache holds before evicting.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Reports whether `key` holds an unexpired entry without promoting it.
    pub fn contains(&self, key: &str) -> bool {
        self.store.lock().contains(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.store.lock().keys()
    }

    /// Key of the most recently used entry.
    pub fn most_recent(&self) -> Option<String> {
        self.store.lock().most_recent().map(str::to_owned)
    }

    /// Key of the least recently used entry, the next eviction candidate.
    pub fn least_recent(&self) -> Option<String> {
        self.store.lock().least_recent().map(str::to_owned)
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    // == Dump ==
    /// Lists every entry from most to least recently used.
    pub fn dump(&self) -> Vec<DumpEntry> {
        self.store.lock().dump()
    }

    /// Logs the dump at debug level.
    pub fn show(&self) {
        self.store.lock().show();
    }

    /// Returns true while a background sweeper is running.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.lock().is_some()
    }

    // == Close ==
    /// Stops the background sweeper. Safe to call any number of times.
    pub fn close(&self) {
        let sweeper = self.sweeper.lock().take();
        if let Some(mut sweeper) = sweeper {
            info!("stopping background sweeper");
            sweeper.stop();
        }
    }
}

impl Drop for LocalCache {
    fn drop(&mut self) {
        self.close();
    }
}
