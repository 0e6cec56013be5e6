//! Capped exponential backoff with full jitter.

use super::math::bounded_scale;
use super::strategy::{DelayBounds, DelayContext, JitterStrategy, bounds_nanos, uniform_nanos};
use rand::RngCore;
use std::time::Duration;

/// Full-jitter exponential backoff.
///
/// The ceiling depends only on how many attempts remain, never on the delay
/// realized last time. The delay is drawn uniformly below that ceiling and
/// raised to `min` if it lands short.
///
/// # Mathematical Formula
///
/// ```text
/// ceiling = min(max, min * 2^remaining)
/// delay   = max(min, random[0, ceiling))
/// ```
///
/// The product saturates at `max` instead of overflowing, so large attempt
/// budgets are safe. An empty range (`ceiling <= min`, or `min >= max`)
/// yields `min`.
///
/// # Examples
///
/// ```rust
/// use backoff_jitter::retry::{DelayBounds, DelayContext, ExponentialJitter, JitterStrategy};
/// use std::time::Duration;
///
/// let bounds = DelayBounds::new(Duration::from_millis(100), Duration::from_secs(3));
/// let ctx = DelayContext {
///     attempt: 1,
///     remaining: 4,
///     previous: bounds.min(),
/// };
///
/// let delay = ExponentialJitter.next_delay(&ctx, &bounds, &mut rand::thread_rng());
/// assert!(delay >= Duration::from_millis(100));
/// assert!(delay < Duration::from_millis(1600));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExponentialJitter;

impl ExponentialJitter {
    /// Upper bound of the draw for a given number of remaining attempts.
    ///
    /// Non-decreasing in `remaining` and saturating at `bounds.max()`.
    pub fn ceiling(&self, remaining: u32, bounds: &DelayBounds) -> Duration {
        let (min, max) = bounds_nanos(bounds);
        Duration::from_nanos(bounded_scale(min, remaining, max))
    }
}

impl JitterStrategy for ExponentialJitter {
    fn next_delay(
        &self,
        ctx: &DelayContext,
        bounds: &DelayBounds,
        rng: &mut dyn RngCore,
    ) -> Duration {
        if bounds.is_empty() {
            return bounds.min();
        }

        let (min, max) = bounds_nanos(bounds);
        let ceiling = bounded_scale(min, ctx.remaining, max);
        let drawn = uniform_nanos(rng, 0, ceiling);

        bounds.clamp(Duration::from_nanos(drawn))
    }
}
