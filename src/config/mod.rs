//! Cache configuration.
//!
//! Each bounded cache has its own configuration struct with public fields, so
//! a configuration is built by naming every field:
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | `LfuCacheConfig` | [`LfuCache`](crate::LfuCache) | Least Frequently Used |
//! | `DlfuCacheConfig` | [`DlfuCache`](crate::DlfuCache) | Decaying LFU with TTL |
//!
//! [`SimpleCache`](crate::SimpleCache) is unbounded and takes no configuration.
//!
//! A `capacity` of zero cannot be expressed because the field is a
//! [`NonZeroUsize`](core::num::NonZeroUsize). The numeric constructors
//! (`try_new`) report it as [`ConfigError::ZeroCapacity`](crate::ConfigError).
//!
//! # Examples
//!
//! ```
//! use polycache::config::LruCacheConfig;
//! use polycache::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! ```

pub mod dlfu;
pub mod lfu;
pub mod lru;

pub use dlfu::{DlfuCacheConfig, ExpiryPolicy};
pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;
