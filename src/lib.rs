//! Local Cache - an embeddable in-process key-value cache
//!
//! Bounded capacity with LRU eviction, per-item and default TTL expiration, and an
//! optional background sweeper that purges expired entries.
//!
//! ```no_run
//! use std::time::Duration;
//! use local_cache::{LocalCache, StorageConfig, Ttl};
//!
//! let config = StorageConfig::new(Duration::from_secs(60), 1000)
//!     .with_cleanup_interval(Duration::from_secs(5));
//! let cache = LocalCache::new(config)?;
//!
//! cache.insert("user:1", "alice");
//! cache.set("session", "token", Ttl::After(Duration::from_secs(10)));
//! cache.set("pinned", "config", Ttl::Never);
//!
//! if let Some(item) = cache.get("user:1") {
//!     assert_eq!(item.value(), b"alice");
//! }
//! # Ok::<(), local_cache::CacheError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheItem, CacheStats, CacheStore, DumpEntry, LocalCache, Ttl};
pub use config::StorageConfig;
pub use error::{CacheError, Result};
pub use tasks::Sweeper;
