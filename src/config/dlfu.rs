//! Configuration for the Decaying LFU (DLFU) cache.
//!
//! DLFU weighs recent reads more heavily than old ones. Every operation
//! multiplies a cache-wide increment by a decay factor derived from `gamma`
//! and the capacity; each read adds the current increment to the entry's
//! priority. Old reads therefore count for progressively less.
//!
//! # Choosing `gamma`
//!
//! | `gamma` | Behaviour |
//! |---------|-----------|
//! | `0.0`   | Increment doubles every operation; effectively recency only |
//! | `0.5`   | Priorities decay by half over roughly `capacity / 2` operations |
//! | `1.0`   | No decay; pure frequency counting with increment 1 |
//!
//! # Expiry
//!
//! Every entry carries an absolute expiry instant computed from its TTL at
//! write time. An expired entry is never returned by a read. With
//! [`ExpiryPolicy::Lazy`] expired entries are dropped only when they surface
//! at the heap root during an insert or through
//! [`DlfuCache::purge_expired`](crate::DlfuCache::purge_expired); until then
//! they still count toward `len`. [`ExpiryPolicy::Sweep`] purges the whole
//! cache on every insert of a new key.
//!
//! # Examples
//!
//! ```
//! use polycache::config::{DlfuCacheConfig, ExpiryPolicy};
//! use polycache::DlfuCache;
//! use core::num::NonZeroUsize;
//! use std::time::Duration;
//!
//! let config = DlfuCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//!     gamma: 0.8,
//!     default_ttl: Duration::from_secs(300),
//!     expiry: ExpiryPolicy::Lazy,
//! };
//! let cache: DlfuCache<String, Vec<u8>> = DlfuCache::init(config, None).unwrap();
//! assert_eq!(cache.gamma(), 0.8);
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;
use std::time::Duration;

const MAX_DECAY: f64 = 2.0;

/// When expired DLFU entries are physically removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Expired entries are removed only when they reach the heap root during
    /// an insert, or by an explicit purge.
    #[default]
    Lazy,
    /// Every insert of a new key first removes all expired entries.
    Sweep,
}

/// Configuration for a DLFU (Decaying Least Frequently Used) cache.
#[derive(Clone, Copy)]
pub struct DlfuCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
    /// Decay parameter in `[0, 1]`.
    pub gamma: f64,
    /// TTL applied by writes that do not name one.
    pub default_ttl: Duration,
    /// How expired entries are reclaimed.
    pub expiry: ExpiryPolicy,
}

impl DlfuCacheConfig {
    /// Creates a configuration with no default expiry and lazy reclamation.
    pub fn new(capacity: NonZeroUsize, gamma: f64) -> Self {
        Self {
            capacity,
            gamma,
            default_ttl: Duration::MAX,
            expiry: ExpiryPolicy::Lazy,
        }
    }

    /// Checks that `gamma` lies within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.gamma) {
            Ok(())
        } else {
            Err(ConfigError::GammaOutOfRange(self.gamma))
        }
    }

    /// Starting increment: `1 / (1 - gamma)`, or 1 when `gamma` is 1.
    pub(crate) fn initial_increment(&self) -> f64 {
        if self.gamma < 1.0 {
            1.0 / (1.0 - self.gamma)
        } else {
            1.0
        }
    }

    /// Per-operation growth of the increment: `(p + 1) / p` with
    /// `p = capacity * gamma`, capped at 2. Growth is disabled at
    /// `gamma == 1`.
    ///
    /// From a factor of 2 upward every step already outweighs all earlier
    /// steps combined, so larger factors give the same eviction order. The
    /// cap also keeps a single step well inside the renormalisation range
    /// when `p` is tiny.
    pub(crate) fn decay(&self) -> f64 {
        if self.gamma >= 1.0 {
            return 1.0;
        }
        let p = self.capacity.get() as f64 * self.gamma;
        if p <= 1.0 {
            MAX_DECAY
        } else {
            (p + 1.0) / p
        }
    }
}

impl fmt::Debug for DlfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DlfuCacheConfig")
            .field("capacity", &self.capacity)
            .field("gamma", &self.gamma)
            .field("default_ttl", &self.default_ttl)
            .field("expiry", &self.expiry)
            .finish()
    }
}
