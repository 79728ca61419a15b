//! Least Frequently Used Cache Implementation.
//!
//! The LFU cache counts reads per entry and, once over capacity, evicts the
//! entry with the lowest count. Among entries with the same count the one
//! written longest ago goes first.
//!
//! # Algorithm
//!
//! Entries live in an [`IndexedMinHeap`] ordered by `(frequency, seq)`, where
//! `seq` is stamped on every write. The key map stores each entry's arena
//! handle, and every entry records its own heap position, so a hit bumps the
//! frequency and sifts the entry down in O(log n) without searching for it.
//!
//! - `get` hit: `frequency += 1`, then restore heap order.
//! - `set` of an existing key: replace the value and restart the entry at
//!   frequency 1 under a new `seq`.
//! - `set` of a new key: push it at frequency 1, then pop the minimum if the
//!   cache is over capacity. When every resident entry has been read at least
//!   once, the minimum is the newcomer itself.
//!
//! # Performance Characteristics
//!
//! | Operation | Time |
//! |-----------|------|
//! | get / set / delete | O(log n) |
//! | contains | O(1) average |
//! | keys / values | O(n) |

use crate::arena::SlotId;
use crate::cache::Cache;
use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::error::ConfigError;
use crate::heap::IndexedMinHeap;
use crate::meta::LfuMeta;
use crate::metrics::{CacheMetrics, LfuCacheMetrics};
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

/// Internal LFU segment containing the actual cache algorithm.
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    config: LfuCacheConfig,

    /// Entries ordered by `(frequency, seq)`.
    heap: IndexedMinHeap<CacheEntry<K, V, LfuMeta>>,

    /// Key to arena handle of the entry in `heap`.
    map: HashMap<K, SlotId, S>,

    next_seq: u64,

    metrics: LfuCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuSegment<K, V, S> {
    pub(crate) fn init(config: LfuCacheConfig, hash_builder: S) -> Self {
        let reserve = config.capacity.get().min(MAX_PREALLOCATED_ENTRIES);
        LfuSegment {
            config,
            heap: IndexedMinHeap::with_capacity(reserve),
            map: HashMap::with_capacity_and_hasher(reserve, hash_builder),
            next_seq: 0,
            metrics: LfuCacheMetrics::default(),
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
    pub(crate) fn metrics(&self) -> &LfuCacheMetrics {
        &self.metrics
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Current frequency of `key`, without counting as a read.
    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.get(key)?;
        self.heap.get(*id).map(|entry| entry.metadata.frequency)
    }

    /// Returns the value for `key`, bumping its frequency.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(id) = self.map.get(key).copied() else {
            self.metrics.core.record_miss();
            return None;
        };
        let frequency = self.heap.get_mut(id)?.metadata.increment();
        self.heap.fix(id);
        self.metrics.record_frequency_hit(frequency);
        self.heap.get(id).map(|entry| &entry.value)
    }

    /// Inserts or updates `key`. Returns the entry evicted to stay within
    /// capacity, which may be the one just inserted.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        let seq = self.next_seq();

        if let Some(&id) = self.map.get(&key) {
            if let Some(entry) = self.heap.get_mut(id) {
                entry.value = value;
                entry.metadata.reset(seq);
            }
            self.heap.fix(id);
            self.metrics.core.record_update();
            return None;
        }

        let entry = CacheEntry::with_metadata(key.clone(), value, LfuMeta::new(seq));
        let id = self.heap.push(entry);
        self.map.insert(key, id);
        self.metrics.core.record_insertion();

        if self.map.len() <= self.cap().get() {
            return None;
        }
        let victim = self.heap.pop()?;
        self.map.remove(&victim.key);
        let frequency = victim.metadata.frequency;
        self.metrics.record_frequency_eviction(frequency);
        trace!(frequency, "evicted least frequently used entry");
        Some(victim.into_pair())
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        self.heap.remove(id).map(|entry| entry.value)
    }

    pub(crate) fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.heap.clear();
        debug!(dropped, "cleared LFU cache");
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.heap.iter().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V, S> fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.map.len())
            .field("heap", &self.heap)
            .finish()
    }
}

/// A thread-safe Least Frequently Used (LFU) cache.
///
/// # Examples
///
/// ```
/// use polycache::{Cache, LfuCache};
///
/// let cache = LfuCache::new(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
///
/// // "a" is read twice, "b" never
/// cache.get(&"a");
/// cache.get(&"a");
///
/// cache.set("c", 3);
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LfuSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LfuCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid LFU cache configuration: {err}"),
        }
    }

    /// Creates a cache holding at most `capacity` entries, rejecting zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self::init(LfuCacheConfig::try_from(capacity)?, None))
    }

    /// Creates a cache from a configuration with an optional hasher.
    pub fn init(config: LfuCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Creates a cache that hashes keys with `hash_builder`.
    pub fn init_with_hasher(config: LfuCacheConfig, hash_builder: S) -> Self {
        debug!(capacity = config.capacity.get(), "created LFU cache");
        Self {
            segment: Mutex::new(LfuSegment::init(config, hash_builder)),
        }
    }

    /// Maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns how many times `key` has been counted since its last write,
    /// without counting this call. A freshly written key reports 1.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().frequency(key)
    }

    /// Applies `f` to the value for `key` under the lock, without cloning.
    ///
    /// Counts as a read, exactly like [`Cache::get`].
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }
}

impl<K, V, S> Cache<K, V> for LfuCache<K, V, S>
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

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LfuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}

impl<K, V, S> fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
