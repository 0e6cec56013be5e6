//! Error types for retry configuration.
//!
//! The retry loop itself never produces errors of its own: it hands back the
//! operation's error untouched. Only loading and validating a
//! [`RetryConfig`](crate::config::RetryConfig) can fail with a [`ConfigError`].

use std::time::Duration;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Problems found while building a retry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The attempt budget must allow at least one invocation.
    #[error("attempts must be at least 1")]
    ZeroAttempts,

    /// The minimum delay exceeds the maximum delay.
    #[error("min delay {min:?} is greater than max delay {max:?}")]
    InvertedBounds {
        /// Configured minimum delay
        min: Duration,
        /// Configured maximum delay
        max: Duration,
    },

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Name of the offending variable
        var: &'static str,
        /// The raw value found
        value: String,
    },

    /// A jitter name other than `exponential` or `decorrelated`.
    #[error("unknown jitter strategy: {0:?}")]
    UnknownJitter(String),
}
