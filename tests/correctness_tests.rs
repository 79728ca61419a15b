//! Correctness Tests for Cache Algorithms
//!
//! Each test drives one cache through a short, deterministic access pattern
//! and checks exactly which key was evicted or expired.
//!
//! ## Test Strategy
//! - Small capacities (1-4 entries) for predictable behavior
//! - Explicit checks for which key is gone after each overflowing `set`
//! - TTL tests use short real sleeps

use polycache::config::{DlfuCacheConfig, ExpiryPolicy, LfuCacheConfig, LruCacheConfig};
use polycache::metrics::CacheMetrics;
use polycache::{Cache, DlfuCache, LfuCache, LruCache, SimpleCache};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

// ============================================================================
// HELPER FUNCTIONS FOR CACHE CREATION
// ============================================================================

fn make_lru<K: Hash + Eq + Clone, V: Clone>(cap: usize) -> LruCache<K, V> {
    let config = LruCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    LruCache::init(config, None)
}

fn make_lfu<K: Hash + Eq + Clone, V: Clone>(cap: usize) -> LfuCache<K, V> {
    let config = LfuCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    LfuCache::init(config, None)
}

fn make_dlfu<K: Hash + Eq + Clone, V: Clone>(cap: usize, gamma: f64) -> DlfuCache<K, V> {
    let config = DlfuCacheConfig::new(NonZeroUsize::new(cap).unwrap(), gamma);
    DlfuCache::init(config, None).unwrap()
}

fn make_dlfu_sweeping<K: Hash + Eq + Clone, V: Clone>(cap: usize, gamma: f64) -> DlfuCache<K, V> {
    let config = DlfuCacheConfig {
        expiry: ExpiryPolicy::Sweep,
        ..DlfuCacheConfig::new(NonZeroUsize::new(cap).unwrap(), gamma)
    };
    DlfuCache::init(config, None).unwrap()
}

fn sorted<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items
}

// ============================================================================
// SIMPLE
// ============================================================================

#[test]
fn test_simple_holds_everything() {
    let cache = SimpleCache::new();
    for i in 0..1000 {
        cache.set(i, i.to_string());
    }
    assert_eq!(cache.len(), 1000);
    assert_eq!(cache.get(&999), Some("999".to_string()));
    assert_eq!(sorted(cache.keys()).len(), 1000);
}

#[test]
fn test_simple_merge_then_read() {
    let a = SimpleCache::new();
    a.set("k1", 1);
    let b = SimpleCache::new();
    b.set("k1", 100);
    b.set("k2", 2);

    a.merge(&b);
    assert_eq!(a.get(&"k1"), Some(100));
    assert_eq!(a.get(&"k2"), Some(2));
    assert_eq!(sorted(a.values()), vec![2, 100]);
}

// ============================================================================
// LRU
// ============================================================================

#[test]
fn test_lru_evicts_tail_after_read() {
    let cache = make_lru(2);
    cache.set("A", 1);
    cache.set("B", 2);
    cache.get(&"A");
    cache.set("C", 3);

    assert_eq!(cache.get(&"B"), None);
    assert_eq!(cache.get(&"A"), Some(1));
    assert_eq!(cache.get(&"C"), Some(3));
}

#[test]
fn test_lru_eviction_sequence() {
    let cache = make_lru(3);
    cache.set(1, "one");
    cache.set(2, "two");
    cache.set(3, "three");

    cache.set(4, "four");
    assert!(!cache.contains(&1), "1 was least recently used");

    cache.get(&2);
    cache.set(5, "five");
    assert!(!cache.contains(&3), "3 became least recently used");
    assert!(cache.contains(&2));

    cache.set(4, "FOUR");
    cache.set(6, "six");
    assert!(!cache.contains(&2), "updating 4 left 2 at the tail");
    assert_eq!(sorted(cache.keys()), vec![4, 5, 6]);
}

// ============================================================================
// LFU
// ============================================================================

#[test]
fn test_lfu_evicts_least_read() {
    let cache = make_lfu(2);
    cache.set("A", 1);
    cache.set("B", 2);
    cache.get(&"A");
    cache.get(&"A");
    cache.set("C", 3);

    assert_eq!(cache.get(&"B"), None);
    assert_eq!(cache.get(&"A"), Some(1));
    assert!(cache.contains(&"C"));
}

#[test]
fn test_lfu_breaks_ties_by_write_order() {
    let cache = make_lfu(3);
    cache.set("x", 1);
    cache.set("y", 2);
    cache.set("z", 3);
    cache.get(&"x");
    cache.get(&"y");
    cache.get(&"z");

    cache.set("w", 4);
    // "w" is the only entry at frequency 1
    assert!(!cache.contains(&"w"));
    assert_eq!(sorted(cache.keys()), vec!["x", "y", "z"]);

    cache.get(&"z");
    cache.delete(&"x");
    cache.set("v", 5);
    cache.set("u", 6);
    // "v" and "u" are both at frequency 1; "v" was written first
    assert!(!cache.contains(&"v"));
    assert_eq!(sorted(cache.keys()), vec!["u", "y", "z"]);
}

#[test]
fn test_lfu_frequency_survives_other_evictions() {
    let cache = make_lfu(2);
    let hot = "hot".to_string();
    cache.set(hot.clone(), 0);
    for _ in 0..10 {
        cache.get(&hot);
    }
    for i in 0..20 {
        cache.set(format!("cold{i}"), i);
    }
    assert!(cache.contains(&hot));
    assert_eq!(cache.frequency("hot"), Some(11));
    assert!(cache.contains(&"cold19".to_string()));
}

// ============================================================================
// DLFU
// ============================================================================

#[test]
fn test_dlfu_capacity_eviction() {
    let cache = make_dlfu(2, 0.5);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(2));
    assert_eq!(cache.get(&"c"), Some(3));
}

#[test]
fn test_dlfu_ttl_expiry() {
    let cache = make_dlfu(10, 0.5);
    cache.set_with_ttl("a", 1, Duration::from_millis(10));
    assert_eq!(cache.get(&"a"), Some(1));

    thread::sleep(Duration::from_millis(20));
    assert_eq!(cache.get(&"a"), None);
    assert!(!cache.contains(&"a"));
}

#[test]
fn test_dlfu_expired_entries_linger_until_purged() {
    let cache = make_dlfu(10, 0.5);
    cache.set("anchor", 0);
    cache.set_with_ttl("short", 1, Duration::from_millis(5));
    thread::sleep(Duration::from_millis(15));

    cache.set("new", 2);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.keys().len(), 3);
    assert!(!cache.contains(&"short"));

    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(sorted(cache.keys()), vec!["anchor", "new"]);
}

#[test]
fn test_dlfu_sweep_policy_reclaims_on_insert() {
    let cache = make_dlfu_sweeping(10, 0.5);
    cache.set("anchor", 0);
    cache.set_with_ttl("short", 1, Duration::from_millis(5));
    thread::sleep(Duration::from_millis(15));

    cache.set("new", 2);
    assert_eq!(sorted(cache.keys()), vec!["anchor", "new"]);
    assert_eq!(cache.metrics()["expirations"], 1.0);
}

#[test]
fn test_dlfu_expired_root_is_reclaimed_before_capacity_eviction() {
    let cache = make_dlfu(2, 0.5);
    cache.set_with_ttl("stale", 1, Duration::from_millis(5));
    cache.set("keep", 2);
    thread::sleep(Duration::from_millis(15));

    cache.set("new", 3);
    assert_eq!(sorted(cache.keys()), vec!["keep", "new"]);
    assert_eq!(cache.metrics()["evictions"], 0.0);
}

#[test]
fn test_dlfu_recent_reads_beat_old_reads() {
    let cache = make_dlfu(3, 0.1);
    cache.set("old_favourite", 0);
    for _ in 0..5 {
        cache.get(&"old_favourite");
    }
    cache.set("newcomer", 1);
    for _ in 0..50 {
        cache.get(&"missing");
    }
    cache.get(&"newcomer");
    cache.set("filler", 2);
    cache.set("next", 3);

    assert!(cache.contains(&"newcomer"));
    assert!(!cache.contains(&"old_favourite"));
}

#[test]
fn test_dlfu_set_many_with_ttl() {
    let cache = make_dlfu(10, 0.5);
    cache.set_many_with_ttl(vec![("a", 1), ("b", 2)], Duration::from_millis(5));
    cache.set("c", 3);
    assert_eq!(cache.len(), 3);

    thread::sleep(Duration::from_millis(15));
    let (found, missing) = cache.get_many(&["a", "b", "c"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[&"c"], 3);
    assert_eq!(sorted(missing), vec!["a", "b"]);
}

// ============================================================================
// DELETE / CLEAR IDEMPOTENCE
// ============================================================================

#[test]
fn test_delete_and_clear_are_idempotent() {
    let caches: Vec<Box<dyn Cache<&str, i32>>> = vec![
        Box::new(SimpleCache::<&str, i32>::new()),
        Box::new(make_lru::<&str, i32>(4)),
        Box::new(make_lfu::<&str, i32>(4)),
        Box::new(make_dlfu::<&str, i32>(4, 0.5)),
    ];

    for cache in &caches {
        cache.delete(&"absent");
        cache.set("a", 1);
        cache.set("b", 2);

        cache.delete(&"a");
        cache.delete(&"a");
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.keys().is_empty());
        assert!(cache.values().is_empty());

        cache.set("c", 3);
        assert_eq!(cache.get(&"c"), Some(3));
    }
}
