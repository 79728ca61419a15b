//! Error types for cache construction.
//!
//! Lookups never fail: a missing or expired key is reported as `None`. The only
//! fallible operation is building a cache from an invalid configuration.
//!
//! ```
//! use polycache::{ConfigError, DlfuCache};
//!
//! let err = DlfuCache::<String, i32>::try_new(100, 1.5).unwrap_err();
//! assert_eq!(err, ConfigError::GammaOutOfRange(1.5));
//! ```

use thiserror::Error;

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// A bounded cache was configured with a capacity of zero.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    /// The DLFU decay parameter was outside `[0, 1]` or NaN.
    #[error("gamma must be within [0, 1], got {0}")]
    GammaOutOfRange(f64),
}
