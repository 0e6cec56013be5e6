//! The jitter capability shared by every retry loop.

use super::decorrelated::DecorrelatedJitter;
use super::exponential::ExponentialJitter;
use super::math::duration_to_nanos;
use crate::error::ConfigError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Lower and upper bound for every computed delay.
///
/// The bounds are stored as given. Ordering `min <= max` is the caller's
/// responsibility: with `min > max` every strategy yields `min`, since the
/// lower bound is applied last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayBounds {
    min: Duration,
    max: Duration,
}

impl DelayBounds {
    /// Create bounds without reordering or repairing them.
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// The smallest delay a strategy may return.
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// The largest delay a strategy may return.
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Whether there is no room to draw from, i.e. `min >= max`.
    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    /// Clamp `delay` down to `max`, then up to `min`.
    ///
    /// Unlike [`Ord::clamp`] this never panics on inverted bounds.
    pub fn clamp(&self, delay: Duration) -> Duration {
        delay.min(self.max).max(self.min)
    }
}

/// What a strategy knows about the retry sequence when asked for a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayContext {
    /// 1-based index of the attempt that just failed.
    pub attempt: u32,
    /// Invocations still allowed after this one.
    pub remaining: u32,
    /// Last delay computed in this sequence, or the minimum delay before the
    /// first one.
    pub previous: Duration,
}

/// Computes the pause before the next attempt.
///
/// Implementations are stateless: anything carried between attempts lives in
/// [`DelayContext`], which is owned by a single retry invocation. That keeps
/// one strategy value shareable between any number of concurrent loops.
///
/// # Examples
///
/// ```rust
/// use backoff_jitter::retry::{DelayBounds, DelayContext, JitterStrategy};
/// use rand::RngCore;
/// use std::time::Duration;
///
/// /// Always waits the minimum.
/// struct Constant;
///
/// impl JitterStrategy for Constant {
///     fn next_delay(
///         &self,
///         _ctx: &DelayContext,
///         bounds: &DelayBounds,
///         _rng: &mut dyn RngCore,
///     ) -> Duration {
///         bounds.min()
///     }
/// }
/// ```
pub trait JitterStrategy: Send + Sync {
    /// Delay to sleep before the attempt following `ctx.attempt`.
    ///
    /// The result must lie in `[bounds.min(), bounds.max()]` whenever the
    /// bounds are ordered.
    fn next_delay(
        &self,
        ctx: &DelayContext,
        bounds: &DelayBounds,
        rng: &mut dyn RngCore,
    ) -> Duration;
}

/// Draw uniformly from `[low, high)` nanoseconds, or return `low` when the
/// range is empty.
pub(crate) fn uniform_nanos(rng: &mut dyn RngCore, low: u64, high: u64) -> u64 {
    if low >= high {
        low
    } else {
        rng.gen_range(low..high)
    }
}

/// Convert bounds to nanoseconds once per draw.
pub(crate) fn bounds_nanos(bounds: &DelayBounds) -> (u64, u64) {
    (duration_to_nanos(bounds.min), duration_to_nanos(bounds.max))
}

/// Selector between the built-in strategies.
///
/// Serializes as `"exponential"` or `"decorrelated"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jitter {
    /// Capped exponential ceiling with full jitter, see [`ExponentialJitter`].
    #[default]
    Exponential,
    /// Random walk seeded by the previous delay, see [`DecorrelatedJitter`].
    Decorrelated,
}

impl JitterStrategy for Jitter {
    fn next_delay(
        &self,
        ctx: &DelayContext,
        bounds: &DelayBounds,
        rng: &mut dyn RngCore,
    ) -> Duration {
        match self {
            Jitter::Exponential => ExponentialJitter.next_delay(ctx, bounds, rng),
            Jitter::Decorrelated => DecorrelatedJitter.next_delay(ctx, bounds, rng),
        }
    }
}

impl fmt::Display for Jitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jitter::Exponential => f.write_str("exponential"),
            Jitter::Decorrelated => f.write_str("decorrelated"),
        }
    }
}

impl FromStr for Jitter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" => Ok(Jitter::Exponential),
            "decorrelated" => Ok(Jitter::Decorrelated),
            _ => Err(ConfigError::UnknownJitter(s.to_string())),
        }
    }
}
