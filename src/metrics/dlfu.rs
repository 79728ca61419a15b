//! DLFU cache metrics.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// DLFU-specific metrics (extends [`CoreCacheMetrics`]).
#[derive(Debug, Default, Clone)]
pub struct DlfuCacheMetrics {
    /// Core metrics common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Reads that found their key present but expired.
    pub expired_reads: u64,

    /// Entries removed because their TTL had elapsed.
    pub expirations: u64,

    /// Times every priority was rescaled to keep the increment finite.
    pub renormalizations: u64,

    /// Increment that the next hit will add.
    pub current_increment: f64,

    /// Priority of the most recently evicted entry.
    pub last_evicted_priority: f64,
}

impl DlfuCacheMetrics {
    /// Creates metrics seeded with the starting increment.
    pub fn new(initial_increment: f64) -> Self {
        Self {
            current_increment: initial_increment,
            ..Default::default()
        }
    }

    /// Records a read that found an expired entry. Counts as a miss.
    pub fn record_expired_read(&mut self) {
        self.core.record_miss();
        self.expired_reads += 1;
    }

    /// Records `count` entries removed for having expired.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    /// Records the capacity eviction of an entry with `priority`.
    pub fn record_priority_eviction(&mut self, priority: f64) {
        self.core.record_eviction();
        self.last_evicted_priority = priority;
    }

    /// Converts DLFU metrics to a map for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("current_increment".to_string(), self.current_increment);
        metrics.insert("expirations".to_string(), self.expirations as f64);
        metrics.insert("expired_reads".to_string(), self.expired_reads as f64);
        metrics.insert(
            "last_evicted_priority".to_string(),
            self.last_evicted_priority,
        );
        metrics.insert(
            "renormalizations".to_string(),
            self.renormalizations as f64,
        );

        metrics
    }
}

impl CacheMetrics for DlfuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "DLFU"
    }
}
