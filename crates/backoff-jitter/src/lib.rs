#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry-with-backoff for fallible operations.
//!
//! An operation is invoked until it succeeds or an attempt budget runs out,
//! with a randomized pause between attempts so that many callers retrying
//! against the same resource do not fall into lockstep.
//!
//! - **Two jitter strategies** via the `JitterStrategy` trait
//!   - Exponential: full jitter under a capped `min * 2^n` ceiling
//!   - Decorrelated: random walk from the previous delay, at most 3x per step
//! - **One retry loop** via `Backoff`, blocking or async
//! - **Injectable randomness** for deterministic tests
//! - **Serde-friendly configuration** via `RetryConfig`
//!
//! Errors are never inspected or wrapped: every failure is retried, and once
//! the budget is spent the last error is handed back unchanged. A success
//! discards all earlier failures.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//!
//! let mut count = 0;
//! let result = backoff_jitter::retry(
//!     5,                          // attempts
//!     Duration::from_millis(1),   // min
//!     Duration::from_millis(20),  // max
//!     || {
//!         count += 1;
//!         if count == 5 { Ok(()) } else { Err("op error") }
//!     },
//! );
//!
//! assert_eq!(result, Ok(()));
//! assert_eq!(count, 5);
//! ```
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use backoff_jitter::prelude::*;
//!
//! let backoff = Backoff::builder().attempts(3).jitter(Jitter::Decorrelated).build();
//! let value = backoff.execute(|| Ok::<_, std::io::Error>(42)).unwrap();
//! assert_eq!(value, 42);
//! ```
//!
//! # Features
//!
//! - `tracing`: emit `debug` events for each retry and on exhaustion. Off by
//!   default; error values are never logged.

pub mod config;
pub mod error;
pub mod retry;

mod property_tests;

pub use config::RetryConfig;
pub use error::ConfigError;
pub use retry::{retry, retry_decorrelated};

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use backoff_jitter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RetryConfig;
    pub use crate::error::ConfigError;
    pub use crate::retry::{
        Backoff, BackoffBuilder, DecorrelatedJitter, DelayBounds, DelayContext,
        ExponentialJitter, Jitter, JitterStrategy, retry, retry_decorrelated,
    };
}
