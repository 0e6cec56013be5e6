//! Saturating integer helpers for delay arithmetic.
//!
//! Delays are computed on `u64` nanoseconds. Anything that would overflow
//! saturates instead of wrapping.

use std::time::Duration;

/// Convert a duration to whole nanoseconds, saturating at `u64::MAX`.
pub fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Compute `min(ceiling, base * 2^exponent)` without overflowing.
///
/// A zero base stays zero. Otherwise either the power or the product
/// overflowing `u64` means the true value is beyond any representable
/// ceiling, so the result is `ceiling`.
///
/// # Examples
///
/// ```rust
/// use backoff_jitter::retry::math::bounded_scale;
///
/// assert_eq!(bounded_scale(100, 3, 10_000), 800);
/// assert_eq!(bounded_scale(100, 10, 10_000), 10_000);
/// assert_eq!(bounded_scale(100, 200, u64::MAX), u64::MAX);
/// ```
pub fn bounded_scale(base: u64, exponent: u32, ceiling: u64) -> u64 {
    if base == 0 {
        return 0;
    }
    2u64.checked_pow(exponent)
        .and_then(|factor| base.checked_mul(factor))
        .map_or(ceiling, |scaled| scaled.min(ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_nanos() {
        assert_eq!(duration_to_nanos(Duration::ZERO), 0);
        assert_eq!(duration_to_nanos(Duration::from_millis(3)), 3_000_000);
        assert_eq!(duration_to_nanos(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_bounded_scale_below_ceiling() {
        assert_eq!(bounded_scale(1, 0, 100), 1);
        assert_eq!(bounded_scale(5, 4, 100), 80);
    }

    #[test]
    fn test_bounded_scale_saturates() {
        // 2^64 overflows the power itself
        assert_eq!(bounded_scale(1, 64, 42), 42);
        // Power fits, product does not
        assert_eq!(bounded_scale(u64::MAX / 2, 2, 7), 7);
    }

    #[test]
    fn test_bounded_scale_zero_base() {
        assert_eq!(bounded_scale(0, 10, 500), 0);
        assert_eq!(bounded_scale(0, 1_000, 7), 0);
    }
}
