//! The contract shared by every cache policy.
//!
//! [`Cache`] is object safe, so callers can hold a `Box<dyn Cache<K, V>>` or
//! `Arc<dyn Cache<K, V>>` and swap eviction policies without touching call
//! sites:
//!
//! ```
//! use polycache::{Cache, DlfuCache, LfuCache, LruCache, SimpleCache};
//! use std::sync::Arc;
//!
//! let caches: Vec<Arc<dyn Cache<String, u32>>> = vec![
//!     Arc::new(SimpleCache::new()),
//!     Arc::new(LruCache::new(16)),
//!     Arc::new(LfuCache::new(16)),
//!     Arc::new(DlfuCache::new(16, 0.5)),
//! ];
//!
//! for cache in &caches {
//!     cache.set("answer".to_string(), 42);
//!     assert_eq!(cache.get(&"answer".to_string()), Some(42));
//! }
//! ```
//!
//! All methods take `&self`; each implementation serialises access behind its
//! own lock. The batch methods are sequences of single-key calls and are not
//! atomic as a group.

use core::hash::Hash;
use std::collections::{HashMap, HashSet};

/// A thread-safe key-value cache.
///
/// Values are returned by clone, so `V` is typically cheap to clone (an
/// `Arc`, a small `Copy` type or a short string).
pub trait Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is present and readable. Has no side effects on
    /// eviction order or metrics.
    fn contains(&self, key: &K) -> bool;

    /// Returns a clone of the value for `key`, updating the policy's
    /// bookkeeping (recency, frequency or priority) on a hit.
    fn get(&self, key: &K) -> Option<V>;

    /// Looks up every key in turn.
    ///
    /// Returns the values found and the keys that were not. Every input key
    /// appears in exactly one of the two. Duplicate input keys are looked up
    /// once.
    fn get_many(&self, keys: &[K]) -> (HashMap<K, V>, Vec<K>) {
        let mut found = HashMap::with_capacity(keys.len());
        let mut missing = Vec::new();
        let mut seen = HashSet::with_capacity(keys.len());
        for key in keys {
            if !seen.insert(key) {
                continue;
            }
            match self.get(key) {
                Some(value) => {
                    found.insert(key.clone(), value);
                }
                None => missing.push(key.clone()),
            }
        }
        (found, missing)
    }

    /// Stores `value` under `key`, evicting according to the policy if the
    /// cache is bounded and full.
    fn set(&self, key: K, value: V);

    /// Stores every pair in order.
    fn set_many(&self, items: Vec<(K, V)>) {
        for (key, value) in items {
            self.set(key, value);
        }
    }

    /// Removes `key`. Does nothing if it is absent.
    fn delete(&self, key: &K);

    /// Removes every entry.
    fn clear(&self);

    /// Snapshot of the stored keys, in unspecified order.
    fn keys(&self) -> Vec<K>;

    /// Snapshot of the stored values, in unspecified order.
    fn values(&self) -> Vec<V>;
}
