//! LRU cache settings.

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Settings for [`LruCache`](crate::LruCache).
///
/// Once a `set` would exceed `capacity`, the entry read or written longest
/// ago is dropped first.
///
/// ```
/// use polycache::config::LruCacheConfig;
/// use polycache::LruCache;
///
/// let config = LruCacheConfig::try_from(500usize).unwrap();
/// let cache: LruCache<&str, i32> = LruCache::init(config, None);
/// assert_eq!(cache.cap().get(), 500);
///
/// assert!(LruCacheConfig::try_from(0usize).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct LruCacheConfig {
    /// Most entries the cache holds after any `set`.
    pub capacity: NonZeroUsize,
}

impl TryFrom<usize> for LruCacheConfig {
    type Error = ConfigError;

    fn try_from(capacity: usize) -> Result<Self, Self::Error> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self { capacity })
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LruCacheConfig {{ capacity: {} }}", self.capacity)
    }
}
