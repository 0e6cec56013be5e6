//! Retry loops and jitter strategies.
//!
//! This module provides one retry loop, [`Backoff`], driven by a pluggable
//! [`JitterStrategy`] that picks the pause after each failure.
//!
//! # Key Types
//!
//! - [`Backoff`] - The attempt/sleep loop
//! - [`JitterStrategy`] - Core trait for delay computation
//! - [`ExponentialJitter`] - Full jitter under a capped exponential ceiling
//! - [`DecorrelatedJitter`] - Random walk from the previous delay
//! - [`Jitter`] - Selector between the two built-in strategies
//!
//! # Examples
//!
//! ```rust
//! use backoff_jitter::retry::retry_decorrelated;
//! use std::time::Duration;
//!
//! let mut calls = 0;
//! let result = retry_decorrelated(4, Duration::from_millis(1), Duration::from_millis(10), || {
//!     calls += 1;
//!     if calls < 2 { Err("flaky") } else { Ok("ok") }
//! });
//!
//! assert_eq!(result, Ok("ok"));
//! assert_eq!(calls, 2);
//! ```

mod backoff;
mod decorrelated;
mod exponential;
pub mod math;
mod strategy;

pub use backoff::{Backoff, BackoffBuilder, Delays};
pub use decorrelated::DecorrelatedJitter;
pub use exponential::ExponentialJitter;
pub use strategy::{DelayBounds, DelayContext, Jitter, JitterStrategy};

use std::time::Duration;

/// Retry `operation` up to `attempts` times with exponential full jitter.
///
/// Blocks the calling thread for each delay. Returns the first success, or
/// the error of the last attempt once the budget is spent. An `attempts` of
/// zero runs the operation once.
pub fn retry<T, E, F>(
    attempts: u32,
    min_delay: Duration,
    max_delay: Duration,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    Backoff::with_strategy(
        attempts,
        DelayBounds::new(min_delay, max_delay),
        Jitter::Exponential,
    )
    .execute(operation)
}

/// Retry `operation` up to `attempts` times with decorrelated jitter.
///
/// Same contract as [`retry`]; only the delay computation differs.
pub fn retry_decorrelated<T, E, F>(
    attempts: u32,
    min_delay: Duration,
    max_delay: Duration,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    Backoff::with_strategy(
        attempts,
        DelayBounds::new(min_delay, max_delay),
        Jitter::Decorrelated,
    )
    .execute(operation)
}
