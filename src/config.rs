//! Configuration Module
//!
//! Handles building, validating and loading the cache configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default TTL applied to entries set without an explicit TTL
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of entries
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default interval between background sweeps
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Cache configuration parameters.
///
/// Durations serialize as whole milliseconds so hosts can embed this struct in
/// their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// TTL for entries set with [`Ttl::Default`](crate::Ttl::Default).
    /// Zero means such entries never expire.
    #[serde(rename = "default_ttl_ms", with = "millis")]
    pub default_ttl: Duration,
    /// Maximum number of entries, must be positive
    pub capacity: usize,
    /// Interval between background sweeps, `None` disables the sweeper
    #[serde(rename = "cleanup_interval_ms", with = "opt_millis")]
    pub cleanup_interval: Option<Duration>,
}

impl StorageConfig {
    /// Creates a config with the given default TTL and capacity and no sweeper.
    pub fn new(default_ttl: Duration, capacity: usize) -> Self {
        Self {
            default_ttl,
            capacity,
            cleanup_interval: None,
        }
    }

    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = Some(interval);
        self
    }

    /// Creates a new config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_SECS` - Default TTL in seconds, 0 disables (default: 300)
    /// - `CACHE_CLEANUP_INTERVAL_SECS` - Sweep frequency in seconds, 0 disables (default: 1)
    ///
    /// Unset variables fall back to their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let capacity = parse_var(&lookup, "CACHE_CAPACITY", DEFAULT_CAPACITY)?;
        let default_ttl = parse_var(&lookup, "CACHE_DEFAULT_TTL_SECS", DEFAULT_TTL.as_secs())?;
        let cleanup_interval = parse_var(
            &lookup,
            "CACHE_CLEANUP_INTERVAL_SECS",
            DEFAULT_CLEANUP_INTERVAL.as_secs(),
        )?;

        let config = Self {
            default_ttl: Duration::from_secs(default_ttl),
            capacity,
            cleanup_interval: (cleanup_interval > 0).then(|| Duration::from_secs(cleanup_interval)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the cache cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// A sweeper only runs when entries can expire by default.
    pub fn sweeper_enabled(&self) -> bool {
        matches!(self.cleanup_interval, Some(interval) if !interval.is_zero())
            && !self.default_ttl.is_zero()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
            cleanup_interval: Some(DEFAULT_CLEANUP_INTERVAL),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfig(format!("{} has an invalid value: {:?}", name, raw))
        }),
    }
}

fn duration_to_millis(d: &Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(super::duration_to_millis(d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod opt_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&super::duration_to_millis(d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|ms| ms.map(Duration::from_millis))
    }
}
