//! Unbounded cache.
//!
//! `SimpleCache` is a hash map behind a `parking_lot::RwLock`. It never evicts,
//! so reads only need the shared lock and run in parallel with each other.
//! Use it when the working set is known to fit in memory, or as the baseline
//! the bounded policies are compared against.
//!
//! # Examples
//!
//! ```
//! use polycache::{Cache, SimpleCache};
//!
//! let sessions = SimpleCache::new();
//! sessions.set("alice", 1);
//! sessions.set("bob", 2);
//!
//! let imported = SimpleCache::new();
//! imported.set("bob", 20);
//! imported.set("carol", 30);
//!
//! sessions.merge(&imported);
//! assert_eq!(sessions.len(), 3);
//! assert_eq!(sessions.get(&"bob"), Some(20));
//! ```

use crate::cache::Cache;
use crate::metrics::{CacheMetrics, SimpleCacheMetrics};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A thread-safe, unbounded key-value cache.
pub struct SimpleCache<K, V, S = DefaultHashBuilder> {
    store: RwLock<HashMap<K, V, S>>,
    metrics: SimpleCacheMetrics,
}

impl<K, V> SimpleCache<K, V> {
    /// Creates an empty cache with the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> SimpleCache<K, V, S> {
    /// Creates an empty cache that hashes keys with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            store: RwLock::new(HashMap::with_hasher(hash_builder)),
            metrics: SimpleCacheMetrics::default(),
        }
    }
}

impl<K, V, S> SimpleCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Applies `f` to the value for `key` under the read lock, without cloning.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let store = self.store.read();
        match store.get(key) {
            Some(value) => {
                self.metrics.record_hit();
                Some(f(value))
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Copies every entry of `other` into `self`, overwriting on collision.
    ///
    /// `other` is snapshotted under its read lock before `self` is locked for
    /// writing, so two caches may be merged into each other concurrently.
    /// Merging a cache into itself does nothing.
    pub fn merge(&self, other: &Self)
    where
        K: Clone,
        V: Clone,
    {
        if core::ptr::eq(self, other) {
            return;
        }
        let incoming: Vec<(K, V)> = other
            .store
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let count = incoming.len();

        let mut store = self.store.write();
        for (key, value) in incoming {
            let replaced = store.insert(key, value).is_some();
            self.metrics.record_write(replaced);
        }
        debug!(merged = count, len = store.len(), "merged simple cache");
    }
}

impl<K, V, S> Cache<K, V> for SimpleCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.store.read().len()
    }

    fn contains(&self, key: &K) -> bool {
        self.store.read().contains_key(key)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.get_with(key, V::clone)
    }

    fn set(&self, key: K, value: V) {
        let replaced = self.store.write().insert(key, value).is_some();
        self.metrics.record_write(replaced);
    }

    fn delete(&self, key: &K) {
        self.store.write().remove(key);
    }

    fn clear(&self) {
        let mut store = self.store.write();
        let dropped = store.len();
        store.clear();
        store.shrink_to_fit();
        debug!(dropped, "cleared simple cache");
    }

    fn keys(&self) -> Vec<K> {
        self.store.read().keys().cloned().collect()
    }

    fn values(&self) -> Vec<V> {
        self.store.read().values().cloned().collect()
    }
}

impl<K, V> Default for SimpleCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces an independent copy of the current contents. Metrics start fresh.
impl<K, V, S> Clone for SimpleCache<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            store: RwLock::new(self.store.read().clone()),
            metrics: SimpleCacheMetrics::default(),
        }
    }
}

impl<K, V, S> CacheMetrics for SimpleCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<K, V, S> fmt::Debug for SimpleCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleCache")
            .field("len", &self.store.read().len())
            .finish()
    }
}
