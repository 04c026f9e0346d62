//! Error types for the cache
//!
//! Cache operations are total and never fail. Errors only arise while building a
//! cache: an invalid configuration, or a sweeper that could not be started.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected during validation or parsing
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dedicated sweeper thread or its runtime could not be created
    #[error("Failed to start background sweeper: {0}")]
    SweeperSpawn(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
