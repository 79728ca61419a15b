//! LFU cache settings.

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Settings for [`LfuCache`](crate::LfuCache).
///
/// Once a `set` would exceed `capacity`, the entry with the fewest reads is
/// dropped, oldest write first among equal counts.
///
/// ```
/// use polycache::config::LfuCacheConfig;
/// use polycache::LfuCache;
///
/// let config = LfuCacheConfig::try_from(100usize).unwrap();
/// let cache: LfuCache<&str, i32> = LfuCache::init(config, None);
/// assert_eq!(cache.cap().get(), 100);
///
/// assert!(LfuCacheConfig::try_from(0usize).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct LfuCacheConfig {
    /// Most entries the cache holds after any `set`.
    pub capacity: NonZeroUsize,
}

impl TryFrom<usize> for LfuCacheConfig {
    type Error = ConfigError;

    fn try_from(capacity: usize) -> Result<Self, Self::Error> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self { capacity })
    }
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LfuCacheConfig {{ capacity: {} }}", self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_config_from_capacity() {
        let config = LfuCacheConfig::try_from(100usize).unwrap();
        assert_eq!(config.capacity.get(), 100);
        assert_eq!(format!("{config:?}"), "LfuCacheConfig { capacity: 100 }");
        assert_eq!(
            LfuCacheConfig::try_from(0usize).unwrap_err(),
            ConfigError::ZeroCapacity
        );
    }
}
