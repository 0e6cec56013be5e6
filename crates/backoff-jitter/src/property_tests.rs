//! Property-based tests for the jitter strategies
//!
//! The bounds invariant is statistical: it has to hold for every draw, so it
//! is checked across many generated bounds, budgets and seeds.

#[cfg(test)]
mod tests {
    use crate::retry::{
        Backoff, DelayBounds, DelayContext, ExponentialJitter, Jitter, JitterStrategy,
    };
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    // ===== Strategy Generators =====

    /// Ordered bounds in milliseconds, up to ten minutes.
    fn arb_bounds() -> impl Strategy<Value = DelayBounds> {
        (0u64..600_000, 0u64..600_000).prop_map(|(a, b)| {
            DelayBounds::new(Duration::from_millis(a.min(b)), Duration::from_millis(a.max(b)))
        })
    }

    fn arb_jitter() -> impl Strategy<Value = Jitter> {
        prop_oneof![Just(Jitter::Exponential), Just(Jitter::Decorrelated)]
    }

    // ===== Bounds =====

    proptest! {
        /// Property: every delay lies in [min, max]
        /// Invariant: holds for both strategies and any budget
        #[test]
        fn prop_delays_within_bounds(
            bounds in arb_bounds(),
            jitter in arb_jitter(),
            attempts in 1u32..80,
            seed in any::<u64>(),
        ) {
            let backoff = Backoff::with_strategy(attempts, bounds, jitter);
            let mut rng = StdRng::seed_from_u64(seed);

            let mut count = 0;
            for delay in backoff.delays(&mut rng) {
                prop_assert!(delay >= bounds.min(), "{:?} below {:?}", delay, bounds.min());
                prop_assert!(delay <= bounds.max(), "{:?} above {:?}", delay, bounds.max());
                count += 1;
            }
            prop_assert_eq!(count, attempts - 1);
        }

        /// Property: the exponential ceiling never shrinks as the budget grows
        /// Invariant: ceiling(n) <= ceiling(n + 1) <= max
        #[test]
        fn prop_exponential_ceiling_monotonic(
            bounds in arb_bounds(),
            remaining in 0u32..100,
        ) {
            let lower = ExponentialJitter.ceiling(remaining, &bounds);
            let upper = ExponentialJitter.ceiling(remaining + 1, &bounds);

            prop_assert!(lower <= upper);
            prop_assert!(upper <= bounds.max());
        }

        /// Property: decorrelated delays grow at most 3x per step
        /// Invariant: each draw's upper bound is three times the previous delay
        #[test]
        fn prop_decorrelated_walk_bounded(
            bounds in arb_bounds(),
            attempts in 2u32..60,
            seed in any::<u64>(),
        ) {
            let backoff = Backoff::with_strategy(attempts, bounds, Jitter::Decorrelated);
            let mut rng = StdRng::seed_from_u64(seed);

            let mut previous = bounds.min();
            for delay in backoff.delays(&mut rng) {
                prop_assert!(delay <= previous.saturating_mul(3).max(bounds.min()));
                prop_assert!(delay >= bounds.min() && delay <= bounds.max());
                previous = delay;
            }
        }

        /// Property: inverted bounds always yield the minimum
        /// Invariant: the lower bound wins when min > max
        #[test]
        fn prop_inverted_bounds_yield_min(
            max in 0u64..1_000,
            extra in 1u64..1_000,
            jitter in arb_jitter(),
            remaining in 0u32..40,
            seed in any::<u64>(),
        ) {
            let min = Duration::from_millis(max + extra);
            let bounds = DelayBounds::new(min, Duration::from_millis(max));
            let ctx = DelayContext { attempt: 1, remaining, previous: min };
            let mut rng = StdRng::seed_from_u64(seed);

            prop_assert_eq!(jitter.next_delay(&ctx, &bounds, &mut rng), min);
        }
    }

    // ===== Retry Loop =====

    proptest! {
        /// Property: an always-failing operation runs exactly `attempts` times
        /// Invariant: N invocations, N - 1 sleeps, last error returned
        #[test]
        fn prop_failing_operation_exhausts_budget(
            attempts in 1u32..30,
            jitter in arb_jitter(),
            seed in any::<u64>(),
        ) {
            let backoff = Backoff::builder()
                .attempts(attempts)
                .min_delay(Duration::from_millis(1))
                .max_delay(Duration::from_millis(50))
                .jitter(jitter)
                .build();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut calls = 0u32;
            let mut sleeps = 0u32;

            let result: Result<(), u32> = backoff.execute_with(
                &mut rng,
                |_| sleeps += 1,
                || {
                    calls += 1;
                    Err(calls)
                },
            );

            prop_assert_eq!(result, Err(attempts));
            prop_assert_eq!(calls, attempts);
            prop_assert_eq!(sleeps, attempts - 1);
        }

        /// Property: success on attempt k stops the loop at k
        /// Invariant: k invocations, k - 1 sleeps, success returned
        #[test]
        fn prop_success_short_circuits(
            (attempts, succeed_on) in (1u32..30).prop_flat_map(|n| (Just(n), 1..=n)),
            seed in any::<u64>(),
        ) {
            let backoff = Backoff::builder()
                .attempts(attempts)
                .min_delay(Duration::from_millis(1))
                .max_delay(Duration::from_millis(50))
                .build();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut calls = 0u32;
            let mut sleeps = 0u32;

            let result = backoff.execute_with(
                &mut rng,
                |_| sleeps += 1,
                || {
                    calls += 1;
                    if calls == succeed_on { Ok(calls) } else { Err("not yet") }
                },
            );

            prop_assert_eq!(result, Ok(succeed_on));
            prop_assert_eq!(calls, succeed_on);
            prop_assert_eq!(sleeps, succeed_on - 1);
        }
    }
}
