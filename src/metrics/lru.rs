//! LRU cache metrics.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LRU metrics. Recency ordering adds no counters beyond the core set.
#[derive(Debug, Default, Clone)]
pub struct LruCacheMetrics {
    /// Core metrics common to all cache algorithms.
    pub core: CoreCacheMetrics,
}

impl LruCacheMetrics {
    /// Converts LRU metrics to a map for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        self.core.to_btreemap()
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
