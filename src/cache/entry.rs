//! Cache Entry Module
//!
//! Defines stored entries, the TTL policy of a single write, and the snapshot
//! returned to readers.

use std::time::{Duration, Instant};

// == TTL Policy ==
/// Expiration requested for a single `set`.
///
/// Only applies when the `set` inserts a new entry; updates keep the existing expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the cache's default TTL; never expires when that default is zero
    #[default]
    Default,
    /// Never expires, whatever the default TTL is
    Never,
    /// Expires this long after the write; a zero duration behaves like `Never`
    After(Duration),
}

impl Ttl {
    /// Resolves the policy into an absolute expiration instant.
    ///
    /// An instant too far in the future to represent is treated as no expiration.
    pub fn resolve(self, default_ttl: Duration, now: Instant) -> Option<Instant> {
        match self {
            Ttl::After(ttl) if !ttl.is_zero() => now.checked_add(ttl),
            Ttl::After(_) | Ttl::Never => None,
            Ttl::Default if !default_ttl.is_zero() => now.checked_add(default_ttl),
            Ttl::Default => None,
        }
    }
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Ttl::After(ttl)
    }
}

// == Cache Entry ==
/// A stored key-value pair with its expiration.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub key: String,
    pub value: Vec<u8>,
    /// None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    pub fn new(key: String, value: Vec<u8>, expires_at: Option<Instant>) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` is strictly past its expiration instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    pub fn snapshot(&self) -> CacheItem {
        CacheItem {
            value: self.value.clone(),
            expires_at: self.expires_at,
        }
    }
}

// == Cache Item ==
/// Owned copy of an entry returned by a successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheItem {
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Instant the entry expires at, or None if it never expires.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// Saturates at zero once the expiration instant has passed.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Duration = Duration::from_secs(60);

    #[test]
    fn test_ttl_after_positive() {
        let now = Instant::now();
        let ttl = Ttl::After(Duration::from_secs(5));
        assert_eq!(ttl.resolve(DEFAULT, now), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_ttl_after_zero_never_expires() {
        let now = Instant::now();
        assert_eq!(Ttl::After(Duration::ZERO).resolve(DEFAULT, now), None);
        assert_eq!(Ttl::Never.resolve(DEFAULT, now), None);
    }

    #[test]
    fn test_ttl_default_uses_config() {
        let now = Instant::now();
        assert_eq!(Ttl::Default.resolve(DEFAULT, now), Some(now + DEFAULT));
        assert_eq!(Ttl::Default.resolve(Duration::ZERO, now), None);
    }

    #[test]
    fn test_ttl_from_duration() {
        assert_eq!(
            Ttl::from(Duration::from_millis(10)),
            Ttl::After(Duration::from_millis(10))
        );
    }

    #[test]
    fn test_entry_without_expiration_never_expires() {
        let entry = CacheEntry::new("key".to_string(), b"value".to_vec(), None);
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(3600)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let expires = now + Duration::from_secs(1);
        let entry = CacheEntry::new("key".to_string(), b"value".to_vec(), Some(expires));

        assert!(!entry.is_expired_at(now));
        // still live at the exact expiration instant
        assert!(!entry.is_expired_at(expires), "Entry should be live at boundary");
        assert!(entry.is_expired_at(expires + Duration::from_nanos(1)));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut entry = CacheEntry::new("key".to_string(), b"before".to_vec(), None);
        let item = entry.snapshot();
        entry.value = b"after".to_vec();

        assert_eq!(item.value(), b"before");
        assert_eq!(item.into_value(), b"before".to_vec());
    }

    #[test]
    fn test_ttl_remaining() {
        let item = CacheEntry::new(
            "key".to_string(),
            Vec::new(),
            Some(Instant::now() + Duration::from_secs(10)),
        )
        .snapshot();
        let remaining = item.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));

        let expired = CacheEntry::new("key".to_string(), Vec::new(), Some(Instant::now()))
            .snapshot();
        assert_eq!(expired.ttl_remaining(), Some(Duration::ZERO));

        let forever = CacheEntry::new("key".to_string(), Vec::new(), None).snapshot();
        assert!(forever.ttl_remaining().is_none());
    }
}
