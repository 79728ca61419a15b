//! Decaying Least Frequently Used (DLFU) Cache Implementation.
//!
//! DLFU is a frequency policy in which recent reads count for more than old
//! ones. Each entry carries a floating-point priority; the entry with the
//! lowest priority is evicted. Entries also carry a TTL and are never returned
//! once it has elapsed.
//!
//! # Algorithm
//!
//! The cache keeps a global `increment`, starting at `1 / (1 - gamma)`. After
//! every read or write the increment is multiplied by
//! `decay = (p + 1) / p`, where `p = capacity * gamma`, capped at 2:
//!
//! ```text
//!   set a      a.priority = inc            inc *= decay
//!   get a      a.priority += inc           inc *= decay
//!   get miss                               inc *= decay
//! ```
//!
//! Because the increment grows geometrically, a read made `n` operations ago
//! weighs `decay^-n` of a read made now. Small `gamma` forgets quickly and
//! approaches LRU; `gamma == 1` disables decay and counts reads like LFU.
//!
//! Entries live in an [`IndexedMinHeap`] ordered by `(priority, seq)`.
//!
//! ## Expiry
//!
//! An expired entry is invisible to `get` and `contains` but is not removed
//! by them. Removal happens in three places:
//!
//! - every insert of a new key pops expired entries off the heap root;
//! - [`ExpiryPolicy::Sweep`] purges the whole heap on every such insert;
//! - [`DlfuCache::purge_expired`] purges on demand.
//!
//! Expired entries that never reach the root linger and still count toward
//! `len`, `keys` and `values`.
//!
//! ## Renormalisation
//!
//! The increment grows without bound. Before it would exceed 2^512, every
//! priority and the increment are multiplied by 2^-512. Scaling by a power of
//! two keeps relative order and keeps long-running caches far from `f64`
//! overflow.

use crate::arena::SlotId;
use crate::cache::Cache;
use crate::config::{DlfuCacheConfig, ExpiryPolicy};
use crate::entry::CacheEntry;
use crate::error::ConfigError;
use crate::heap::IndexedMinHeap;
use crate::meta::DlfuMeta;
use crate::metrics::{CacheMetrics, DlfuCacheMetrics};
use crate::MAX_PREALLOCATED_ENTRIES;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// 2^64, exact in binary floating point.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Increment ceiling: 2^512.
const RENORMALIZE_ABOVE: f64 = {
    let t = TWO_POW_64 * TWO_POW_64;
    let t = t * t;
    t * t
};

/// Scale applied to every priority on renormalisation: 2^-512.
const RENORMALIZE_FACTOR: f64 = 1.0 / RENORMALIZE_ABOVE;

/// Internal DLFU segment containing the actual cache algorithm.
///
/// Time is passed in explicitly so that expiry is deterministic under test.
pub(crate) struct DlfuSegment<K, V, S = DefaultHashBuilder> {
    config: DlfuCacheConfig,

    /// Entries ordered by `(priority, seq)`.
    heap: IndexedMinHeap<CacheEntry<K, V, DlfuMeta>>,

    map: HashMap<K, SlotId, S>,

    /// Amount the next hit adds to an entry's priority.
    increment: f64,

    /// Factor applied to `increment` after every operation.
    decay: f64,

    next_seq: u64,

    metrics: DlfuCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> DlfuSegment<K, V, S> {
    pub(crate) fn init(config: DlfuCacheConfig, hash_builder: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let increment = config.initial_increment();
        let reserve = config.capacity.get().min(MAX_PREALLOCATED_ENTRIES);
        Ok(DlfuSegment {
            heap: IndexedMinHeap::with_capacity(reserve),
            map: HashMap::with_capacity_and_hasher(reserve, hash_builder),
            increment,
            decay: config.decay(),
            next_seq: 0,
            metrics: DlfuCacheMetrics::new(increment),
            config,
        })
    }

    #[inline]
    pub(crate) fn config(&self) -> &DlfuCacheConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn increment(&self) -> f64 {
        self.increment
    }

    #[inline]
    pub(crate) fn decay(&self) -> f64 {
        self.decay
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &DlfuCacheMetrics {
        &self.metrics
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Grows the increment by one step, renormalising first if the step
    /// would cross the ceiling.
    fn advance(&mut self) {
        let next = self.increment * self.decay;
        if next > RENORMALIZE_ABOVE {
            self.renormalize();
            self.increment *= self.decay;
        } else {
            self.increment = next;
        }
        self.metrics.current_increment = self.increment;
    }

    fn renormalize(&mut self) {
        self.heap
            .update_all(|entry| entry.metadata.priority *= RENORMALIZE_FACTOR);
        self.increment *= RENORMALIZE_FACTOR;
        self.metrics.renormalizations += 1;
        debug!(
            len = self.map.len(),
            increment = self.increment,
            "renormalized DLFU priorities"
        );
    }

    /// Returns `true` if `key` is stored and not expired at `now`.
    pub(crate) fn contains<Q>(&self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map
            .get(key)
            .and_then(|&id| self.heap.get(id))
            .is_some_and(|entry| !entry.metadata.is_expired(now))
    }

    pub(crate) fn priority<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.get(key)?;
        self.heap.get(*id).map(|entry| entry.metadata.priority)
    }

    /// Returns the value for `key` if it is live at `now`, raising its
    /// priority. The increment decays whether or not the read hits.
    pub(crate) fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let lookup = self.map.get(key).copied().map(|id| {
            let expired = self
                .heap
                .get(id)
                .map_or(true, |entry| entry.metadata.is_expired(now));
            (id, expired)
        });

        match lookup {
            Some((id, false)) => {
                let increment = self.increment;
                if let Some(entry) = self.heap.get_mut(id) {
                    entry.metadata.priority += increment;
                }
                self.heap.fix(id);
                self.metrics.core.record_hit();
                self.advance();
                self.heap.get(id).map(|entry| &entry.value)
            }
            Some((_, true)) => {
                self.metrics.record_expired_read();
                self.advance();
                None
            }
            None => {
                self.metrics.core.record_miss();
                self.advance();
                None
            }
        }
    }

    /// Inserts or updates `key` with priority equal to the current increment
    /// and an expiry of `now + ttl`.
    ///
    /// Inserting a new key then reclaims expired entries according to the
    /// configured [`ExpiryPolicy`] and, if still over capacity, evicts the
    /// lowest-priority entry, which is returned.
    pub(crate) fn put(&mut self, key: K, value: V, ttl: Duration, now: Instant) -> Option<(K, V)>
    where
        K: Clone,
    {
        let priority = self.increment;
        let expires_at = now.checked_add(ttl);
        let seq = self.next_seq();

        if let Some(&id) = self.map.get(&key) {
            if let Some(entry) = self.heap.get_mut(id) {
                entry.value = value;
                entry.metadata.priority = priority;
                entry.metadata.expires_at = expires_at;
                entry.metadata.seq = seq;
            }
            self.heap.fix(id);
            self.metrics.core.record_update();
            self.advance();
            return None;
        }

        let entry = CacheEntry::with_metadata(
            key.clone(),
            value,
            DlfuMeta::new(priority, expires_at, seq),
        );
        let id = self.heap.push(entry);
        self.map.insert(key, id);
        self.metrics.core.record_insertion();

        match self.config.expiry {
            ExpiryPolicy::Lazy => self.pop_expired(now),
            ExpiryPolicy::Sweep => {
                self.purge_expired(now);
            }
        }

        let evicted = if self.map.len() > self.config.capacity.get() {
            self.evict_min()
        } else {
            None
        };
        self.advance();
        evicted
    }

    /// Pops expired entries while the heap root is expired.
    fn pop_expired(&mut self, now: Instant) {
        let mut expired = 0;
        while self
            .heap
            .peek()
            .is_some_and(|entry| entry.metadata.is_expired(now))
        {
            let Some(entry) = self.heap.pop() else {
                break;
            };
            self.map.remove(&entry.key);
            expired += 1;
        }
        if expired > 0 {
            self.metrics.record_expirations(expired);
            trace!(expired, "dropped expired entries at heap root");
        }
    }

    fn evict_min(&mut self) -> Option<(K, V)> {
        let victim = self.heap.pop()?;
        self.map.remove(&victim.key);
        let priority = victim.metadata.priority;
        self.metrics.record_priority_eviction(priority);
        trace!(priority, "evicted lowest priority entry");
        Some(victim.into_pair())
    }

    /// Removes every entry expired at `now` and rebuilds the heap. Returns
    /// the number removed.
    pub(crate) fn purge_expired(&mut self, now: Instant) -> usize {
        let expired = self.heap.retain(|entry| !entry.metadata.is_expired(now));
        for entry in &expired {
            self.map.remove(&entry.key);
        }
        let count = expired.len();
        if count > 0 {
            self.metrics.record_expirations(count);
            debug!(purged = count, len = self.map.len(), "purged expired entries");
        }
        count
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        self.heap.remove(id).map(|entry| entry.value)
    }

    /// Drops every entry. The increment keeps its current value.
    pub(crate) fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.heap.clear();
        debug!(dropped, "cleared DLFU cache");
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.heap.iter().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V, S> fmt::Debug for DlfuSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DlfuSegment")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("increment", &self.increment)
            .field("decay", &self.decay)
            .finish()
    }
}

/// A thread-safe decaying LFU cache with per-entry TTL.
///
/// # Examples
///
/// ```
/// use polycache::{Cache, DlfuCache};
/// use std::time::Duration;
///
/// let cache = DlfuCache::new(2, 0.5);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.set("c", 3);
///
/// // "a" had the lowest priority when "c" arrived
/// assert_eq!(cache.len(), 2);
/// assert!(!cache.contains(&"a"));
///
/// cache.set_with_ttl("session", 7, Duration::from_secs(60));
/// assert_eq!(cache.get(&"session"), Some(7));
/// ```
pub struct DlfuCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<DlfuSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> DlfuCache<K, V> {
    /// Creates a cache holding at most `capacity` entries with decay
    /// parameter `gamma`. Entries written through [`Cache::set`] never expire.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `gamma` lies outside `[0, 1]`.
    pub fn new(capacity: usize, gamma: f64) -> Self {
        match Self::try_new(capacity, gamma) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid DLFU cache configuration: {err}"),
        }
    }

    /// Fallible counterpart of [`new`](Self::new).
    pub fn try_new(capacity: usize, gamma: f64) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        Self::init(DlfuCacheConfig::new(capacity, gamma), None)
    }

    /// Creates a cache from a configuration with an optional hasher.
    pub fn init(
        config: DlfuCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> DlfuCache<K, V, S> {
    /// Creates a cache that hashes keys with `hash_builder`.
    pub fn init_with_hasher(config: DlfuCacheConfig, hash_builder: S) -> Result<Self, ConfigError> {
        let segment = DlfuSegment::init(config, hash_builder)?;
        debug!(
            capacity = config.capacity.get(),
            gamma = config.gamma,
            decay = segment.decay(),
            "created DLFU cache"
        );
        Ok(Self {
            segment: Mutex::new(segment),
        })
    }

    /// Maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().config().capacity
    }

    /// The decay parameter this cache was built with.
    pub fn gamma(&self) -> f64 {
        self.segment.lock().config().gamma
    }

    /// Factor applied to the increment after every operation.
    pub fn decay(&self) -> f64 {
        self.segment.lock().decay()
    }

    /// Amount the next hit will add to an entry's priority.
    pub fn current_increment(&self) -> f64 {
        self.segment.lock().increment()
    }

    /// TTL used by [`Cache::set`].
    pub fn default_ttl(&self) -> Duration {
        self.segment.lock().config().default_ttl
    }

    /// Current priority of `key`, expired or not, without counting as a read.
    pub fn priority<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().priority(key)
    }

    /// Applies `f` to the live value for `key` under the lock, without
    /// cloning. Counts as a read, exactly like [`Cache::get`].
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key, Instant::now()).map(f)
    }

    /// Stores `value` under `key`, expiring `ttl` from now.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration)
    where
        K: Clone,
    {
        self.segment.lock().put(key, value, ttl, Instant::now());
    }

    /// Stores every pair in order with the same `ttl`.
    pub fn set_many_with_ttl(&self, items: Vec<(K, V)>, ttl: Duration)
    where
        K: Clone,
    {
        for (key, value) in items {
            self.set_with_ttl(key, value, ttl);
        }
    }

    /// Removes every expired entry, wherever it sits in the heap. Returns the
    /// number removed.
    pub fn purge_expired(&self) -> usize {
        self.segment.lock().purge_expired(Instant::now())
    }
}

/// `len`, `keys` and `values` include expired entries that have not been
/// reclaimed yet. `contains` and `get` never report them.
impl<K, V, S> Cache<K, V> for DlfuCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.segment.lock().len()
    }

    fn contains(&self, key: &K) -> bool {
        self.segment.lock().contains(key, Instant::now())
    }

    fn get(&self, key: &K) -> Option<V> {
        self.get_with(key, V::clone)
    }

    fn set(&self, key: K, value: V) {
        let mut segment = self.segment.lock();
        let ttl = segment.config().default_ttl;
        segment.put(key, value, ttl, Instant::now());
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

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for DlfuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "DLFU"
    }
}

impl<K, V, S> fmt::Debug for DlfuCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DlfuCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const FOREVER: Duration = Duration::MAX;
    const SHORT: Duration = Duration::from_millis(10);

    fn segment(cap: usize, gamma: f64) -> DlfuSegment<&'static str, i32> {
        segment_with(cap, gamma, ExpiryPolicy::Lazy)
    }

    fn segment_with(cap: usize, gamma: f64, expiry: ExpiryPolicy) -> DlfuSegment<&'static str, i32> {
        let config = DlfuCacheConfig {
            expiry,
            ..DlfuCacheConfig::new(NonZeroUsize::new(cap).unwrap(), gamma)
        };
        DlfuSegment::init(config, DefaultHashBuilder::default()).unwrap()
    }

    fn sorted_keys(segment: &DlfuSegment<&'static str, i32>) -> Vec<&'static str> {
        let mut keys: Vec<_> = segment.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_renormalize_constants_are_exact() {
        assert_eq!(RENORMALIZE_ABOVE, 2f64.powi(512));
        assert_eq!(RENORMALIZE_ABOVE * RENORMALIZE_FACTOR, 1.0);
    }

    #[test]
    fn test_dlfu_capacity_eviction() {
        let now = Instant::now();
        let mut s = segment(2, 0.5);
        assert_eq!(s.put("a", 1, FOREVER, now), None);
        assert_eq!(s.put("b", 2, FOREVER, now), None);
        assert_eq!(s.priority(&"a"), Some(2.0));
        assert_eq!(s.priority(&"b"), Some(4.0));

        assert_eq!(s.put("c", 3, FOREVER, now), Some(("a", 1)));
        assert_eq!(s.len(), 2);
        assert_eq!(s.priority(&"c"), Some(8.0));
        assert_eq!(s.increment(), 16.0);
    }

    #[test]
    fn test_dlfu_reads_protect_entries() {
        let now = Instant::now();
        let mut s = segment(2, 0.5);
        s.put("a", 1, FOREVER, now);
        s.put("b", 2, FOREVER, now);
        assert_eq!(s.get(&"a", now), Some(&1));
        assert_eq!(s.get(&"a", now), Some(&1));
        assert_eq!(s.priority(&"a"), Some(26.0));

        assert_eq!(s.put("c", 3, FOREVER, now), Some(("b", 2)));
        assert_eq!(sorted_keys(&s), vec!["a", "c"]);
        s.heap.validate();
    }

    #[test]
    fn test_dlfu_increment_decays_on_every_operation() {
        let now = Instant::now();
        let mut s = segment(10, 0.5);
        let decay = 6.0 / 5.0;
        let mut expected = 2.0;
        assert_eq!(s.increment(), expected);

        s.get(&"missing", now);
        expected *= decay;
        assert_eq!(s.increment(), expected);

        s.put("a", 1, SHORT, now);
        expected *= decay;
        assert_eq!(s.increment(), expected);

        s.put("a", 2, SHORT, now);
        expected *= decay;
        assert_eq!(s.increment(), expected);

        s.get(&"a", now + SHORT * 2);
        expected *= decay;
        assert_eq!(s.increment(), expected);
        assert_eq!(s.metrics().current_increment, expected);
    }

    #[test]
    fn test_dlfu_pure_lfu_at_gamma_one() {
        let now = Instant::now();
        let mut s = segment(2, 1.0);
        assert_eq!(s.decay(), 1.0);
        s.put("a", 1, FOREVER, now);
        s.put("b", 2, FOREVER, now);
        s.get(&"a", now);
        assert_eq!(s.priority(&"a"), Some(2.0));
        assert_eq!(s.put("c", 3, FOREVER, now), Some(("b", 2)));
        assert_eq!(s.increment(), 1.0);
    }

    #[test]
    fn test_dlfu_recency_at_gamma_zero() {
        let now = Instant::now();
        let mut s = segment(2, 0.0);
        assert_eq!(s.decay(), 2.0);
        s.put("a", 1, FOREVER, now);
        s.put("b", 2, FOREVER, now);
        s.get(&"a", now);
        assert_eq!(s.put("c", 3, FOREVER, now), Some(("b", 2)));
    }

    #[test]
    fn test_dlfu_expired_entry_is_invisible_but_counted() {
        let now = Instant::now();
        let later = now + SHORT * 2;
        let mut s = segment(4, 0.5);
        s.put("a", 1, SHORT, now);

        assert!(s.contains(&"a", now));
        assert!(!s.contains(&"a", later));
        assert_eq!(s.get(&"a", later), None);
        assert_eq!(s.len(), 1);
        assert_eq!(s.metrics().expired_reads, 1);

        assert_eq!(s.purge_expired(later), 1);
        assert_eq!(s.len(), 0);
        assert_eq!(s.metrics().expirations, 1);
    }

    #[test]
    fn test_dlfu_insert_pops_expired_root_only() {
        let now = Instant::now();
        let later = now + SHORT * 2;
        let mut s = segment(10, 0.5);
        s.put("keep", 1, FOREVER, now);
        s.put("stale", 2, SHORT, now);
        s.put("fresh", 3, FOREVER, later);

        // "keep" sits at the root and is live, so "stale" lingers
        assert_eq!(s.len(), 3);
        assert!(!s.contains(&"stale", later));
        assert_eq!(sorted_keys(&s), vec!["fresh", "keep", "stale"]);

        let mut s = segment(10, 0.5);
        s.put("stale", 2, SHORT, now);
        s.put("keep", 1, FOREVER, now);
        s.put("fresh", 3, FOREVER, later);
        assert_eq!(sorted_keys(&s), vec!["fresh", "keep"]);
        assert_eq!(s.metrics().expirations, 1);
    }

    #[test]
    fn test_dlfu_sweep_policy_purges_everything() {
        let now = Instant::now();
        let later = now + SHORT * 2;
        let mut s = segment_with(10, 0.5, ExpiryPolicy::Sweep);
        s.put("keep", 1, FOREVER, now);
        s.put("stale", 2, SHORT, now);
        s.put("fresh", 3, FOREVER, later);

        assert_eq!(sorted_keys(&s), vec!["fresh", "keep"]);
        s.heap.validate();
    }

    #[test]
    fn test_dlfu_update_refreshes_priority_and_ttl() {
        let now = Instant::now();
        let later = now + SHORT * 2;
        let mut s = segment(2, 0.5);
        s.put("a", 1, SHORT, now);
        s.put("b", 2, FOREVER, now);
        s.put("a", 10, FOREVER, now);

        assert_eq!(s.len(), 2);
        assert_eq!(s.priority(&"a"), Some(8.0));
        assert_eq!(s.get(&"a", later), Some(&10));
        assert_eq!(s.put("c", 3, FOREVER, later), Some(("b", 2)));
    }

    #[test]
    fn test_dlfu_huge_ttl_never_expires() {
        let now = Instant::now();
        let mut s = segment(2, 0.5);
        s.put("a", 1, Duration::MAX, now);
        assert!(s.contains(&"a", now + Duration::from_secs(10 * 365 * 24 * 3600)));
    }

    #[test]
    fn test_dlfu_renormalization_preserves_order() {
        let now = Instant::now();
        let mut s = segment(2, 0.0);
        s.put("older", 1, FOREVER, now);
        s.put("newer", 2, FOREVER, now);
        for _ in 0..600 {
            s.get(&"missing", now);
        }

        assert!(s.metrics().renormalizations >= 1);
        assert!(s.increment().is_finite());
        assert!(s.increment() <= RENORMALIZE_ABOVE);
        let older = s.priority(&"older").unwrap();
        let newer = s.priority(&"newer").unwrap();
        assert!(older > 0.0);
        assert!(older < newer);

        assert_eq!(s.put("next", 3, FOREVER, now), Some(("older", 1)));
        s.heap.validate();
    }

    #[test]
    fn test_dlfu_tiny_gamma_stays_finite() {
        let now = Instant::now();
        let mut s = segment(2, 1e-300);
        assert_eq!(s.decay(), 2.0);
        for _ in 0..2000 {
            s.get(&"missing", now);
        }
        assert!(s.increment().is_finite());

        s.put("x", 1, FOREVER, now);
        s.put("y", 2, FOREVER, now);
        s.get(&"x", now);
        s.get(&"x", now);
        assert!(s.priority(&"x").unwrap() > s.priority(&"y").unwrap());
        assert_eq!(s.put("z", 3, FOREVER, now), Some(("y", 2)));
        s.heap.validate();
    }

    #[test]
    fn test_dlfu_delete_and_clear() {
        let now = Instant::now();
        let mut s = segment(4, 0.5);
        s.put("a", 1, FOREVER, now);
        s.put("b", 2, FOREVER, now);
        assert_eq!(s.remove(&"a"), Some(1));
        assert_eq!(s.remove(&"a"), None);
        assert_eq!(s.len(), 1);

        let increment = s.increment();
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.increment(), increment);
        s.put("c", 3, FOREVER, now);
        assert_eq!(s.get(&"c", now), Some(&3));
    }

    #[test]
    fn test_dlfu_config_errors() {
        assert_eq!(
            DlfuCache::<&str, i32>::try_new(0, 0.5).unwrap_err(),
            ConfigError::ZeroCapacity
        );
        assert_eq!(
            DlfuCache::<&str, i32>::try_new(10, 1.5).unwrap_err(),
            ConfigError::GammaOutOfRange(1.5)
        );
        assert!(DlfuCache::<&str, i32>::try_new(10, f64::NAN).is_err());
    }

    #[test]
    #[should_panic(expected = "invalid DLFU cache configuration")]
    fn test_dlfu_new_rejects_negative_gamma() {
        let _ = DlfuCache::<&str, i32>::new(10, -0.5);
    }

    #[test]
    fn test_dlfu_cache_accessors() {
        let cache: DlfuCache<&str, i32> = DlfuCache::new(10, 0.5);
        assert_eq!(cache.cap().get(), 10);
        assert_eq!(cache.gamma(), 0.5);
        assert_eq!(cache.decay(), 1.2);
        assert_eq!(cache.current_increment(), 2.0);
        assert_eq!(cache.default_ttl(), Duration::MAX);
        assert_eq!(cache.algorithm_name(), "DLFU");
    }

    #[test]
    fn test_dlfu_cache_default_ttl_from_config() {
        let config = DlfuCacheConfig {
            default_ttl: Duration::ZERO,
            ..DlfuCacheConfig::new(NonZeroUsize::new(4).unwrap(), 0.5)
        };
        let cache: DlfuCache<&str, i32> = DlfuCache::init(config, None).unwrap();
        cache.set("a", 1);
        thread::sleep(Duration::from_millis(5));
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_dlfu_concurrent_access() {
        let cache = Arc::new(DlfuCache::new(64, 0.9));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = (t * 31 + i) % 128;
                        match i % 3 {
                            0 => cache.set(key, i),
                            1 => cache.set_with_ttl(key, i, Duration::from_millis(1)),
                            _ => {
                                let _ = cache.get(&key);
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 64);
        assert_eq!(cache.keys().len(), cache.len());
    }
}
