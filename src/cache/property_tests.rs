//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple reference model and to
//! verify the list/index invariants after every operation.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheStore, Ttl};

// == Test Configuration ==
const TEST_CAPACITY: usize = 5;

// == Strategies ==
/// Small key space so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "k[0-9]"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,16}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Clear,
    CleanupExpired,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Clear),
        1 => Just(CacheOp::CleanupExpired),
    ]
}

// == Reference Model ==
/// Recency list kept as a Vec, most recent first.
#[derive(Debug, Default)]
struct Model {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl Model {
    fn promote(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.insert(0, key.to_string());
    }

    fn set(&mut self, key: &str, value: &str, capacity: usize) -> bool {
        let updated = self.values.contains_key(key);
        if !updated && self.order.len() == capacity {
            if let Some(evicted) = self.order.pop() {
                self.values.remove(&evicted);
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        self.promote(key);
        updated
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let value = self.values.get(key).cloned()?;
        self.promote(key);
        Some(value)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.order.retain(|k| k != key);
        self.values.remove(key).is_some()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.values.clear();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any sequence of operations on never-expiring entries matches the model
    // exactly, and the list and index stay consistent throughout.
    #[test]
    fn prop_matches_lru_model(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let mut store = CacheStore::new(TEST_CAPACITY, Duration::ZERO);
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let expected = model.set(&key, &value, TEST_CAPACITY);
                    prop_assert_eq!(store.set(key, value, Ttl::Default), expected);
                }
                CacheOp::Get { key } => {
                    let expected = model.get(&key);
                    let actual = store
                        .get(&key)
                        .map(|item| String::from_utf8(item.into_value()).unwrap());
                    prop_assert_eq!(actual, expected);
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.delete(&key));
                }
                CacheOp::Clear => {
                    store.clear();
                    model.clear();
                }
                CacheOp::CleanupExpired => {
                    prop_assert_eq!(store.cleanup_expired(), 0);
                }
            }

            store.assert_consistent();
            prop_assert_eq!(store.keys(), model.order.clone());
            prop_assert_eq!(store.len(), model.order.len());
            prop_assert_eq!(store.most_recent(), model.order.first().map(String::as_str));
            prop_assert_eq!(store.least_recent(), model.order.last().map(String::as_str));
        }
    }

    // Distinct keys fill the cache one by one, the latest always at the head.
    #[test]
    fn prop_distinct_sets_fill_to_capacity(count in 1usize..=TEST_CAPACITY) {
        let mut store = CacheStore::new(TEST_CAPACITY, Duration::ZERO);

        for i in 0..count {
            let key = format!("key{}", i);
            prop_assert!(!store.set(key.clone(), "v", Ttl::Default));
            prop_assert_eq!(store.len(), i + 1);
            prop_assert_eq!(store.most_recent(), Some(key.as_str()));
        }
    }

    // Once full, every new key evicts exactly the previous tail.
    #[test]
    fn prop_eviction_removes_exactly_the_tail(extra in 1usize..20) {
        let mut store = CacheStore::new(TEST_CAPACITY, Duration::ZERO);
        for i in 0..TEST_CAPACITY {
            store.set(format!("key{}", i), "v", Ttl::Default);
        }

        for i in 0..extra {
            let tail = store.least_recent().map(str::to_owned).unwrap();
            store.set(format!("new{}", i), "v", Ttl::Default);

            prop_assert_eq!(store.len(), TEST_CAPACITY);
            prop_assert!(!store.contains(&tail));
            store.assert_consistent();
        }
        prop_assert_eq!(store.stats().evictions, extra as u64);
    }
}

// Separate block with fewer cases for time-sensitive expiration checks
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // cleanup_expired removes exactly the entries whose TTL elapsed.
    #[test]
    fn prop_cleanup_removes_only_expired(expiring in prop::collection::vec(any::<bool>(), 1..20)) {
        let mut store = CacheStore::new(64, Duration::ZERO);
        for (i, short) in expiring.iter().enumerate() {
            let ttl = if *short {
                Ttl::After(Duration::from_millis(5))
            } else if i % 2 == 0 {
                Ttl::Never
            } else {
                Ttl::After(Duration::from_secs(3600))
            };
            store.set(format!("key{}", i), "v", ttl);
        }

        std::thread::sleep(Duration::from_millis(20));

        let expected_removed = expiring.iter().filter(|short| **short).count();
        prop_assert_eq!(store.cleanup_expired(), expected_removed);
        prop_assert_eq!(store.len(), expiring.len() - expected_removed);
        for (i, short) in expiring.iter().enumerate() {
            prop_assert_eq!(store.contains(&format!("key{}", i)), !*short);
        }
        store.assert_consistent();
    }
}
