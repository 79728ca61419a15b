//! Unbounded cache metrics.
//!
//! [`SimpleCache`](crate::SimpleCache) serves reads under a shared lock, so its
//! counters are atomics that readers can bump without exclusive access.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters for the unbounded cache.
#[derive(Debug, Default)]
pub struct SimpleCacheMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    insertions: AtomicU64,
    updates: AtomicU64,
}

impl SimpleCacheMetrics {
    pub(crate) fn record_hit(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self, replaced: bool) {
        if replaced {
            self.updates.fetch_add(1, Ordering::Relaxed);
        } else {
            self.insertions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Takes a point-in-time copy of the counters.
    ///
    /// Counters are read independently, so under concurrent traffic the copy
    /// may mix values from slightly different moments; `cache_hits` never
    /// exceeds `requests`.
    pub fn snapshot(&self) -> CoreCacheMetrics {
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let requests = self.requests.load(Ordering::Relaxed).max(cache_hits);
        CoreCacheMetrics {
            requests,
            cache_hits,
            insertions: self.insertions.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: 0,
        }
    }
}

impl CacheMetrics for SimpleCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.snapshot().to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "SIMPLE"
    }
}
