//! Least Recently Used (LRU) Cache Implementation
//!
//! The LRU cache keeps entries in order of last use and evicts the entry that
//! was read or written longest ago once the cache is full.
//!
//! # Algorithm
//!
//! A hash map from key to [`SlotId`] sits next to an arena-backed doubly
//! linked list. The head of the list is the most recently used entry and the
//! tail the least recently used one.
//!
//! ```text
//!   map: { "a" -> s1, "b" -> s0, "c" -> s2 }
//!
//!   head                                  tail
//!    [ s2: c ] <-> [ s1: a ] <-> [ s0: b ]
//!     (MRU)                        (LRU)
//! ```
//!
//! - `get` hit: splice the node to the head.
//! - `set` existing key: replace the value and splice to the head.
//! - `set` new key at capacity: drop the tail, then attach the new node at the
//!   head.
//!
//! # Performance Characteristics
//!
//! | Operation | Time |
//! |-----------|------|
//! | get / set / delete / contains | O(1) average |
//! | keys / values | O(n) |
//!
//! # Thread Safety
//!
//! The algorithm lives in `LruSegment`, which requires `&mut self`.
//! [`LruCache`] wraps one segment in a `parking_lot::Mutex`, so every
//! operation, reads included, takes the lock exclusively.

use crate::arena::SlotId;
use crate::cache::Cache;
use crate::config::LruCacheConfig;
use crate::entry::CacheEntry;
use crate::error::ConfigError;
use crate::list::List;
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use crate::MAX_PREALLOCATED_ENTRIES;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal LRU segment containing the actual cache algorithm.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: List<CacheEntry<K, V>>,
    map: HashMap<K, SlotId, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn init(config: LruCacheConfig, hash_builder: S) -> Self {
        let reserve = config.capacity.get().min(MAX_PREALLOCATED_ENTRIES);
        LruSegment {
            config,
            list: List::with_capacity(reserve),
            map: HashMap::with_capacity_and_hasher(reserve, hash_builder),
            metrics: LruCacheMetrics::default(),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Returns the value for `key` and marks it most recently used.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(node) => {
                self.list.move_to_front(node);
                self.metrics.core.record_hit();
                self.list.get_value(node).map(|entry| &entry.value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    /// Inserts or updates `key`. Returns the entry evicted to make room, if
    /// any.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            self.list.move_to_front(node);
            self.list.update(node, CacheEntry::new(key, value));
            self.metrics.core.record_update();
            return None;
        }

        let mut evicted = None;
        if self.map.len() >= self.cap().get() {
            if let Some(old) = self.list.remove_last() {
                self.map.remove(&old.key);
                self.metrics.core.record_eviction();
                trace!(len = self.map.len(), "evicted least recently used entry");
                evicted = Some(old.into_pair());
            }
        }

        let node = self.list.add(CacheEntry::new(key.clone(), value));
        self.map.insert(key, node);
        self.metrics.core.record_insertion();
        evicted
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        self.list.remove(node).map(|entry| entry.value)
    }

    pub(crate) fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.list.clear();
        debug!(dropped, "cleared LRU cache");
    }

    /// Iterates entries from most to least recently used.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V, S> fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}

/// A thread-safe Least Recently Used (LRU) cache.
///
/// # Examples
///
/// ```
/// use polycache::{Cache, LruCache};
///
/// let cache = LruCache::new(2);
///
/// cache.set("apple", 1);
/// cache.set("banana", 2);
///
/// // Reading "apple" makes "banana" the least recently used entry
/// assert_eq!(cache.get(&"apple"), Some(1));
///
/// cache.set("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(1));
/// assert_eq!(cache.get(&"cherry"), Some(3));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LruSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to handle
    /// that case.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid LRU cache configuration: {err}"),
        }
    }

    /// Creates a cache holding at most `capacity` entries, rejecting zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self::init(LruCacheConfig::try_from(capacity)?, None))
    }

    /// Creates a cache from a configuration with an optional hasher.
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a cache that hashes keys with `hash_builder`.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        debug!(capacity = config.capacity.get(), "created LRU cache");
        Self {
            segment: Mutex::new(LruSegment::init(config, hash_builder)),
        }
    }

    /// Maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Applies `f` to the value for `key` under the lock, without cloning.
    ///
    /// Has the same effect on recency as [`Cache::get`].
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }
}

/// `keys` and `values` are returned from most to least recently used.
impl<K, V, S> Cache<K, V> for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.segment.lock().len()
    }

    fn contains(&self, key: &K) -> bool {
        self.segment.lock().contains(key)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.get_with(key, V::clone)
    }

    fn set(&self, key: K, value: V) {
        self.segment.lock().put(key, value);
    }

    fn delete(&self, key: &K) {
        self.segment.lock().remove(key);
    }

    fn clear(&self) {
        self.segment.lock().clear();
    }

    fn keys(&self) -> Vec<K> {
        self.segment.lock().iter().map(|(key, _)| key.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.segment
            .lock()
            .iter()
            .map(|(_, value)| value.clone())
            .collect()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
