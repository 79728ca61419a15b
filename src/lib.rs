#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Algorithm Selection Guide
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                 Which Cache Should I Use?                            │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │  Does the working set fit in memory?                                 │
//! │     Yes ──▶ SimpleCache                                              │
//! │     No                                                               │
//! │      │                                                               │
//! │      ▼                                                               │
//! │  Is "recently used" the best predictor of reuse?                     │
//! │     Yes ──▶ LruCache                                                 │
//! │     No                                                               │
//! │      │                                                               │
//! │      ▼                                                               │
//! │  Is popularity stable over time?                                     │
//! │     Yes ──▶ LfuCache                                                 │
//! │     No  ──▶ DlfuCache (tune gamma; entries can carry a TTL)          │
//! │                                                                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Cache | Eviction | Lock | get | set |
//! |-------|----------|------|-----|-----|
//! | [`SimpleCache`] | none | `RwLock` | O(1) | O(1) |
//! | [`LruCache`] | least recently used | `Mutex` | O(1) | O(1) |
//! | [`LfuCache`] | lowest read count | `Mutex` | O(log n) | O(log n) |
//! | [`DlfuCache`] | lowest decayed priority, plus TTL | `Mutex` | O(log n) | O(log n) |
//!
//! Every cache implements [`Cache`], so a `Box<dyn Cache<K, V>>` can hold any
//! of them. Every cache also implements
//! [`CacheMetrics`](metrics::CacheMetrics).
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` on construction, `clear`, merges,
//! purges and renormalisation, and `trace` for each eviction. No subscriber is
//! installed; events are dropped unless the application sets one up.
//!
//! ## Modules
//!
//! - [`cache`]: The [`Cache`] trait
//! - [`simple`]: Unbounded cache
//! - [`lru`]: Least Recently Used cache
//! - [`lfu`]: Least Frequently Used cache
//! - [`dlfu`]: Decaying LFU cache with TTL
//! - [`config`]: Configuration structures for the bounded caches
//! - [`error`]: Configuration errors
//! - [`metrics`]: Metrics collection for cache performance monitoring

/// Slot arena with stable handles, shared by the list and the heap.
pub(crate) mod arena;

/// Key, value and policy metadata for one cached item.
pub(crate) mod entry;

/// Per-entry metadata for the heap-ordered policies.
pub(crate) mod meta;

/// Doubly linked list over the slot arena.
pub(crate) mod list;

/// Binary min-heap whose entries track their own position.
pub(crate) mod heap;

/// The contract shared by every cache policy.
pub mod cache;

/// Cache configuration structures.
pub mod config;

/// Configuration errors.
pub mod error;

/// Cache metrics system.
///
/// Each cache tracks its own counters and reports them through a common trait.
pub mod metrics;

/// Unbounded cache.
pub mod simple;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Least Frequently Used (LFU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least frequently read items
/// when capacity is reached.
pub mod lfu;

/// Decaying LFU (DLFU) cache implementation.
///
/// A frequency cache in which older reads weigh exponentially less than
/// recent ones, with a TTL on every entry.
pub mod dlfu;

/// Upper bound on the storage the bounded caches reserve up front. Larger
/// caches grow on demand.
pub(crate) const MAX_PREALLOCATED_ENTRIES: usize = 1024;

pub use cache::Cache;
pub use config::{DlfuCacheConfig, ExpiryPolicy, LfuCacheConfig, LruCacheConfig};
pub use dlfu::DlfuCache;
pub use error::ConfigError;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use simple::SimpleCache;
