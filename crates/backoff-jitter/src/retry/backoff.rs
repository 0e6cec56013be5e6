//! The retry loop: attempt, back off, repeat.

use super::strategy::{DelayBounds, DelayContext, Jitter, JitterStrategy};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::future::Future;
use std::time::Duration;

/// Runs a fallible operation until it succeeds or the attempt budget runs out.
///
/// Every failure except the last is followed by a pause chosen by the
/// strategy `S`. The loop never looks inside the error: the first success is
/// returned as-is, and after the final failed attempt its error is returned
/// unchanged.
///
/// ```text
/// Ready -> Attempting -> Success
///              |
///              +-> Waiting -> Attempting -> ... -> Exhausted(last error)
/// ```
///
/// All loop state (attempt counter, previous delay) belongs to one call of
/// [`execute`](Self::execute), so a single `Backoff` can drive any number of
/// concurrent invocations.
///
/// # Examples
///
/// ```rust
/// use backoff_jitter::retry::{Backoff, Jitter};
/// use std::time::Duration;
///
/// let backoff = Backoff::builder()
///     .attempts(3)
///     .min_delay(Duration::from_millis(1))
///     .max_delay(Duration::from_millis(5))
///     .jitter(Jitter::Decorrelated)
///     .build();
///
/// let mut calls = 0;
/// let result = backoff.execute(|| {
///     calls += 1;
///     if calls < 3 { Err("not yet") } else { Ok(calls) }
/// });
///
/// assert_eq!(result, Ok(3));
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1) - no allocations during the retry loop
/// - **CPU**: O(1) per retry - integer arithmetic plus one random draw
/// - **I/O**: Blocks the calling thread between attempts (see
///   [`execute_async`](Self::execute_async) for the non-blocking form)
#[derive(Debug, Clone)]
pub struct Backoff<S = Jitter> {
    attempts: u32,
    bounds: DelayBounds,
    strategy: S,
}

impl Backoff<Jitter> {
    /// Create a new builder for configuring a retry loop.
    pub fn builder() -> BackoffBuilder {
        BackoffBuilder::default()
    }
}

impl Default for Backoff<Jitter> {
    /// Defaults:
    /// - `attempts`: 5
    /// - `min_delay`: 100ms
    /// - `max_delay`: 3s
    /// - `jitter`: exponential
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<S: JitterStrategy> Backoff<S> {
    /// Create a retry loop around any [`JitterStrategy`].
    ///
    /// `attempts` is the total number of invocations. Zero behaves like one:
    /// the operation still runs once and is never retried.
    pub fn with_strategy(attempts: u32, bounds: DelayBounds, strategy: S) -> Self {
        Self {
            attempts,
            bounds,
            strategy,
        }
    }

    /// Maximum number of times the operation is invoked.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Bounds applied to every delay.
    pub fn bounds(&self) -> DelayBounds {
        self.bounds
    }

    /// The strategy choosing each delay.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The delays a fully failing invocation would sleep, in order.
    ///
    /// Yields `attempts - 1` values. The retry loop consumes this same
    /// iterator, one item per failure.
    pub fn delays<'a, R: RngCore>(&'a self, rng: &'a mut R) -> Delays<'a, S, R> {
        Delays {
            strategy: &self.strategy,
            bounds: self.bounds,
            rng,
            attempts: self.attempts,
            attempt: 0,
            previous: self.bounds.min(),
        }
    }

    /// Run `operation`, blocking the current thread between attempts.
    ///
    /// Randomness comes from [`rand::thread_rng`].
    pub fn execute<F, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.execute_with(&mut rand::thread_rng(), std::thread::sleep, operation)
    }

    /// Run `operation` with an explicit randomness source and sleeper.
    ///
    /// `sleep` is called exactly once per retry with the chosen delay. Pass a
    /// seeded or fixed-sequence generator and a recording closure to make the
    /// loop deterministic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backoff_jitter::retry::Backoff;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let backoff = Backoff::builder().attempts(4).build();
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut slept = Vec::new();
    ///
    /// let result: Result<(), &str> =
    ///     backoff.execute_with(&mut rng, |d| slept.push(d), || Err("down"));
    ///
    /// assert_eq!(result, Err("down"));
    /// assert_eq!(slept.len(), 3);
    /// ```
    pub fn execute_with<R, Z, F, T, E>(
        &self,
        rng: &mut R,
        mut sleep: Z,
        mut operation: F,
    ) -> Result<T, E>
    where
        R: RngCore,
        Z: FnMut(Duration),
        F: FnMut() -> Result<T, E>,
    {
        let mut delays = self.delays(rng);
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) => match delays.next() {
                    Some(delay) => {
                        delays.trace_retry(delay);
                        sleep(delay);
                    }
                    None => {
                        delays.trace_exhausted();
                        return Err(err);
                    }
                },
            }
        }
    }

    /// Run an async `operation`, awaiting [`tokio::time::sleep`] between
    /// attempts instead of blocking the thread.
    ///
    /// Each invocation seeds its own [`StdRng`] from the OS, so the returned
    /// future is `Send` whenever the operation's future is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backoff_jitter::retry::Backoff;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), std::io::Error> {
    /// let backoff = Backoff::builder()
    ///     .attempts(3)
    ///     .min_delay(Duration::from_millis(10))
    ///     .build();
    ///
    /// let answer = backoff
    ///     .execute_async(|| async { Ok::<_, std::io::Error>(42) })
    ///     .await?;
    /// assert_eq!(answer, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_async<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_async_with(StdRng::from_entropy(), operation).await
    }

    /// Async counterpart of [`execute_with`](Self::execute_with).
    ///
    /// The generator is owned by the returned future, so it stays `Send`
    /// whenever `R` and the operation's future are.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backoff_jitter::retry::Backoff;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// # async fn example() {
    /// let backoff = Backoff::builder().attempts(2).build();
    /// let result: Result<(), &str> = backoff
    ///     .execute_async_with(StdRng::seed_from_u64(7), || async { Err("down") })
    ///     .await;
    /// assert_eq!(result, Err("down"));
    /// # }
    /// ```
    pub async fn execute_async_with<R, F, Fut, T, E>(
        &self,
        mut rng: R,
        mut operation: F,
    ) -> Result<T, E>
    where
        R: RngCore,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut delays = self.delays(&mut rng);
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => match delays.next() {
                    Some(delay) => {
                        delays.trace_retry(delay);
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        delays.trace_exhausted();
                        return Err(err);
                    }
                },
            }
        }
    }
}

/// Delay sequence of one retry invocation.
///
/// Created by [`Backoff::delays`]. Carries the attempt counter and the
/// previous delay for strategies that walk from it.
#[derive(Debug)]
pub struct Delays<'a, S, R> {
    strategy: &'a S,
    bounds: DelayBounds,
    rng: &'a mut R,
    attempts: u32,
    attempt: u32,
    previous: Duration,
}

impl<S, R> Delays<'_, S, R> {
    /// Number of failed attempts accounted for so far.
    pub fn failed_attempts(&self) -> u32 {
        self.attempt
    }

    /// Invocations still allowed.
    pub fn remaining(&self) -> u32 {
        self.attempts.saturating_sub(self.attempt)
    }

    #[cfg(feature = "tracing")]
    fn trace_retry(&self, delay: Duration) {
        tracing::debug!(
            attempt = self.attempt,
            remaining = self.remaining(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "attempt failed, backing off"
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn trace_retry(&self, _delay: Duration) {}

    #[cfg(feature = "tracing")]
    fn trace_exhausted(&self) {
        tracing::debug!(attempts = self.attempts.max(1), "retry budget exhausted");
    }

    #[cfg(not(feature = "tracing"))]
    fn trace_exhausted(&self) {}
}

impl<S: JitterStrategy, R: RngCore> Iterator for Delays<'_, S, R> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let attempt = self.attempt + 1;
        if attempt >= self.attempts {
            return None;
        }
        self.attempt = attempt;

        let ctx = DelayContext {
            attempt,
            remaining: self.attempts - attempt,
            previous: self.previous,
        };
        let delay = self.strategy.next_delay(&ctx, &self.bounds, &mut *self.rng);
        self.previous = delay;
        Some(delay)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.attempts.saturating_sub(self.attempt + 1) as usize;
        (left, Some(left))
    }
}

/// Builder for configuring [`Backoff`].
///
/// # Examples
///
/// ```rust
/// use backoff_jitter::retry::{Backoff, Jitter};
/// use std::time::Duration;
///
/// let backoff = Backoff::builder()
///     .attempts(5)
///     .min_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(3))
///     .jitter(Jitter::Exponential)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct BackoffBuilder {
    attempts: Option<u32>,
    min_delay: Option<Duration>,
    max_delay: Option<Duration>,
    jitter: Option<Jitter>,
}

impl BackoffBuilder {
    /// Set the total number of invocations.
    ///
    /// Default: 5
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Set the smallest delay between attempts.
    ///
    /// Default: 100ms
    pub fn min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = Some(delay);
        self
    }

    /// Set the largest delay between attempts.
    ///
    /// Default: 3s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Choose the jitter strategy.
    ///
    /// Default: [`Jitter::Exponential`]
    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Build the `Backoff` instance.
    ///
    /// Uses default values for any unset parameters. Bounds are taken as
    /// given; use [`RetryConfig::validate`](crate::config::RetryConfig::validate)
    /// to reject inverted ones.
    pub fn build(self) -> Backoff {
        Backoff {
            attempts: self.attempts.unwrap_or(5),
            bounds: DelayBounds::new(
                self.min_delay.unwrap_or(Duration::from_millis(100)),
                self.max_delay.unwrap_or(Duration::from_secs(3)),
            ),
            strategy: self.jitter.unwrap_or_default(),
        }
    }
}
