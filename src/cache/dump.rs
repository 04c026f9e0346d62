//! Diagnostic dump of the recency list.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::entry::CacheEntry;

/// One line of a cache dump, most recently used first.
///
/// Meant for debugging and tests; the layout is not a stable format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    pub key: String,
    /// Value rendered as UTF-8, invalid sequences replaced
    pub value: String,
    /// Wall-clock expiration, None if the entry never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl DumpEntry {
    pub(crate) fn from_entry(entry: &CacheEntry, now: Instant, now_utc: DateTime<Utc>) -> Self {
        Self {
            key: entry.key.clone(),
            value: String::from_utf8_lossy(&entry.value).into_owned(),
            expires_at: entry
                .expires_at
                .and_then(|at| wall_clock(at, now, now_utc)),
        }
    }
}

/// Maps a monotonic instant onto the wall clock relative to a shared `now`.
fn wall_clock(at: Instant, now: Instant, now_utc: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if at >= now {
        let ahead = chrono::Duration::from_std(at - now).ok()?;
        now_utc.checked_add_signed(ahead)
    } else {
        let behind = chrono::Duration::from_std(now - at).ok()?;
        now_utc.checked_sub_signed(behind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_dump_entry_renders_expiration() {
        let now = Instant::now();
        let now_utc = Utc::now();
        let entry = CacheEntry::new(
            "key1".to_string(),
            b"value1".to_vec(),
            Some(now + Duration::from_secs(90)),
        );

        let dumped = DumpEntry::from_entry(&entry, now, now_utc);
        assert_eq!(dumped.key, "key1");
        assert_eq!(dumped.value, "value1");
        assert_eq!(
            dumped.expires_at,
            Some(now_utc + chrono::Duration::seconds(90))
        );
    }

    #[test]
    fn test_dump_entry_never_expires() {
        let entry = CacheEntry::new("key1".to_string(), vec![0xff, b'a'], None);
        let dumped = DumpEntry::from_entry(&entry, Instant::now(), Utc::now());

        assert!(dumped.expires_at.is_none());
        assert_eq!(dumped.value, "\u{fffd}a");
    }

    #[test]
    fn test_dump_entry_serializes() {
        let entry = CacheEntry::new("key1".to_string(), b"v".to_vec(), None);
        let dumped = DumpEntry::from_entry(&entry, Instant::now(), Utc::now());
        let json = serde_json::to_value(&dumped).unwrap();

        assert_eq!(json["key"], "key1");
        assert_eq!(json["value"], "v");
        assert!(json["expires_at"].is_null());
    }
}
