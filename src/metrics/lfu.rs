//! LFU cache metrics.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LFU-specific metrics (extends [`CoreCacheMetrics`]).
#[derive(Debug, Default, Clone)]
pub struct LfuCacheMetrics {
    /// Core metrics common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Highest frequency any entry has reached.
    pub max_frequency: u64,

    /// Total number of frequency increments (one per hit).
    pub total_frequency_increments: u64,

    /// Frequency of the most recently evicted entry.
    pub last_evicted_frequency: u64,
}

impl LfuCacheMetrics {
    /// Records a hit that raised an entry to `new_frequency`.
    pub fn record_frequency_hit(&mut self, new_frequency: u64) {
        self.core.record_hit();
        self.total_frequency_increments += 1;
        if new_frequency > self.max_frequency {
            self.max_frequency = new_frequency;
        }
    }

    /// Records the eviction of an entry that had reached `frequency`.
    pub fn record_frequency_eviction(&mut self, frequency: u64) {
        self.core.record_eviction();
        self.last_evicted_frequency = frequency;
    }

    /// Average number of increments per hit, or 0.0 before the first hit.
    pub fn average_frequency(&self) -> f64 {
        if self.core.cache_hits > 0 {
            self.total_frequency_increments as f64 / self.core.cache_hits as f64
        } else {
            0.0
        }
    }

    /// Converts LFU metrics to a map for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("max_frequency".to_string(), self.max_frequency as f64);
        metrics.insert(
            "total_frequency_increments".to_string(),
            self.total_frequency_increments as f64,
        );
        metrics.insert(
            "last_evicted_frequency".to_string(),
            self.last_evicted_frequency as f64,
        );
        metrics.insert("average_frequency".to_string(), self.average_frequency());

        metrics
    }
}

impl CacheMetrics for LfuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}
