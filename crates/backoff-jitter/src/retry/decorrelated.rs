//! Decorrelated jitter: each delay is drawn relative to the previous one.

use super::math::duration_to_nanos;
use super::strategy::{DelayBounds, DelayContext, JitterStrategy, bounds_nanos, uniform_nanos};
use rand::RngCore;
use std::time::Duration;

/// Decorrelated-jitter backoff.
///
/// ```text
/// delay = clamp(random[min, 3 * previous), min, max)
/// ```
///
/// `previous` starts at `min` and is replaced by every delay handed out, so
/// the sequence is a random walk that can grow by at most 3x per step and
/// never leaves `[min, max]`. The walk lives in [`DelayContext`] and ends
/// with the retry invocation that owns it.
///
/// A zero `min` pins the walk at zero, as `3 * 0` leaves nothing to draw
/// from. Empty ranges yield `min`, matching [`ExponentialJitter`].
///
/// [`ExponentialJitter`]: super::ExponentialJitter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecorrelatedJitter;

impl JitterStrategy for DecorrelatedJitter {
    fn next_delay(
        &self,
        ctx: &DelayContext,
        bounds: &DelayBounds,
        rng: &mut dyn RngCore,
    ) -> Duration {
        if bounds.is_empty() {
            return bounds.min();
        }

        let (min, _) = bounds_nanos(bounds);
        let upper = duration_to_nanos(ctx.previous).saturating_mul(3);
        let drawn = uniform_nanos(rng, min, upper);

        bounds.clamp(Duration::from_nanos(drawn))
    }
}
