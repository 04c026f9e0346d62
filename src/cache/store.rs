//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the LRU list and TTL expiration.
//!
//! `CacheStore` is single-threaded; [`LocalCache`](crate::LocalCache) wraps it in
//! the lock shared with the background sweeper.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, trace};

use crate::cache::dump::DumpEntry;
use crate::cache::entry::{CacheEntry, CacheItem, Ttl};
use crate::cache::lru::LruList;
use crate::cache::stats::CacheStats;
use crate::config::StorageConfig;

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// Every key in `index` points at the list slot holding that key's entry, and
/// every live slot is indexed under its key.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to list slot
    index: HashMap<String, usize>,
    /// Entries ordered by recency
    list: LruList,
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries set with `Ttl::Default`, zero = never expire
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            index: HashMap::new(),
            list: LruList::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
            default_ttl,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.capacity, config.default_ttl)
    }

    // == Set ==
    /// Stores a key-value pair and makes it the most recently used entry.
    ///
    /// Returns `true` when an existing key was updated in place and `false` when
    /// a new entry was inserted. Inserting into a full cache evicts the least
    /// recently used entry first; updates never evict.
    ///
    /// `ttl` only applies to new entries. An update replaces the value and keeps
    /// the expiration the entry was created with.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>, ttl: Ttl) -> bool {
        let key = key.into();
        let value = value.into();

        if let Some(&idx) = self.index.get(&key) {
            self.list.entry_mut(idx).value = value;
            self.list.move_to_front(idx);
            return true;
        }

        if self.list.len() >= self.capacity {
            self.evict();
        }
        let expires_at = ttl.resolve(self.default_ttl, Instant::now());
        let idx = self
            .list
            .push_front(CacheEntry::new(key.clone(), value, expires_at));
        self.index.insert(key, idx);
        false
    }

    // == Get ==
    /// Retrieves a snapshot of the entry stored under `key`.
    ///
    /// An expired entry is removed and reported as a miss. A hit promotes the
    /// entry to most recently used.
    pub fn get(&mut self, key: &str) -> Option<CacheItem> {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.list.entry(idx).is_expired_at(Instant::now()) {
            trace!(key = %key, "lazily removing expired entry");
            self.remove_slot(idx);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.list.move_to_front(idx);
        self.stats.record_hit();
        Some(self.list.entry(idx).snapshot())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.remove_slot(idx);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    // == Cleanup Expired ==
    /// Removes every entry whose expiration passed before the scan started.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        let mut cursor = self.list.head();

        while let Some(idx) = cursor {
            cursor = self.list.next_of(idx);
            if self.list.entry(idx).is_expired_at(now) {
                self.remove_slot(idx);
                removed += 1;
            }
        }

        self.stats.record_expirations(removed);
        removed
    }

    // == Introspection ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Reports whether `key` holds an unexpired entry.
    ///
    /// Neither promotes the entry nor removes it when expired.
    pub fn contains(&self, key: &str) -> bool {
        self.index
            .get(key)
            .is_some_and(|&idx| !self.list.entry(idx).is_expired_at(Instant::now()))
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.list.iter().map(|(_, entry)| entry.key.clone()).collect()
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.list.head().map(|idx| self.list.entry(idx).key.as_str())
    }

    pub fn least_recent(&self) -> Option<&str> {
        self.list.tail().map(|idx| self.list.entry(idx).key.as_str())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.len();
        stats
    }

    // == Dump ==
    /// Lists every entry from most to least recently used, expired ones included.
    pub fn dump(&self) -> Vec<DumpEntry> {
        let now = Instant::now();
        let now_utc = Utc::now();
        self.list
            .iter()
            .map(|(_, entry)| DumpEntry::from_entry(entry, now, now_utc))
            .collect()
    }

    /// Logs the dump at debug level.
    pub fn show(&self) {
        debug!(entries = self.len(), capacity = self.capacity, "cache dump");
        for entry in self.dump() {
            debug!(
                key = %entry.key,
                value = %entry.value,
                expires_at = ?entry.expires_at,
                "cache entry"
            );
        }
    }

    // == LRU Eviction ==
    fn evict(&mut self) {
        if let Some(evicted) = self.list.pop_back() {
            self.index.remove(&evicted.key);
            self.stats.record_eviction();
            debug!(key = %evicted.key, "evicted least recently used entry");
        }
    }

    fn remove_slot(&mut self, idx: usize) {
        let removed = self.list.remove(idx);
        self.index.remove(&removed.key);
    }

    /// Walks the list both ways and checks it against the index.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let forward: Vec<(usize, String)> = self
            .list
            .iter()
            .map(|(idx, entry)| (idx, entry.key.clone()))
            .collect();

        let mut backward = Vec::new();
        let mut cursor = self.list.tail();
        while let Some(idx) = cursor {
            backward.push(idx);
            cursor = self.list.prev_of(idx);
        }
        backward.reverse();

        assert_eq!(forward.len(), self.list.len(), "list length mismatch");
        assert_eq!(forward.len(), self.index.len(), "index size mismatch");
        assert!(self.list.len() <= self.capacity, "capacity exceeded");
        assert_eq!(
            forward.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(),
            backward,
            "forward and backward walks disagree"
        );
        assert_eq!(self.list.head().is_none(), self.list.tail().is_none());
        for (idx, key) in &forward {
            assert_eq!(self.index.get(key), Some(idx), "index out of sync for {}", key);
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default())
    }
}
