//! Cache metrics.
//!
//! Every cache keeps a set of counters and exposes them through the
//! [`CacheMetrics`] trait as a `BTreeMap<String, f64>`. `BTreeMap` keeps the
//! keys in a stable order, so two snapshots can be diffed or printed side by
//! side without sorting.
//!
//! ```
//! use polycache::metrics::CacheMetrics;
//! use polycache::{Cache, LruCache};
//!
//! let cache = LruCache::new(2);
//! cache.set("a", 1);
//! cache.get(&"a");
//! cache.get(&"b");
//!
//! let metrics = cache.metrics();
//! assert_eq!(metrics["cache_hits"], 1.0);
//! assert_eq!(metrics["cache_misses"], 1.0);
//! assert_eq!(cache.algorithm_name(), "LRU");
//! ```

use std::collections::BTreeMap;

pub mod dlfu;
pub mod lfu;
pub mod lru;
pub mod simple;

pub use dlfu::DlfuCacheMetrics;
pub use lfu::LfuCacheMetrics;
pub use lru::LruCacheMetrics;
pub use simple::SimpleCacheMetrics;

/// Counters shared by every cache policy.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of reads made against the cache.
    pub requests: u64,

    /// Reads that found a live entry.
    pub cache_hits: u64,

    /// Writes that created a new entry.
    pub insertions: u64,

    /// Writes that replaced the value of an existing entry.
    pub updates: u64,

    /// Entries removed to stay within capacity.
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Records a read that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a read that did not find its key.
    ///
    /// Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a write of a previously absent key.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a write that overwrote an existing key.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records a capacity eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Fraction of reads that hit, or 0.0 before the first read.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of reads that missed, or 0.0 before the first read.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a map for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for every cache implementation.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification, e.g. `"LRU"` or `"DLFU"`.
    fn algorithm_name(&self) -> &'static str;
}
