//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod dump;
mod entry;
mod local;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use dump::DumpEntry;
pub use entry::{CacheItem, Ttl};
pub use local::LocalCache;
pub use stats::CacheStats;
pub use store::CacheStore;
