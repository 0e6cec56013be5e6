//! Example: Retrying a flaky operation with jittered backoff
//!
//! This example demonstrates:
//! 1. The exponential strategy via the `retry` free function
//! 2. The decorrelated strategy and its delay walk
//! 3. The non-blocking variant on tokio
//!
//! Run with:
//! ```bash
//! cargo run -p backoff-jitter --example retry_example --features tracing
//! ```

use backoff_jitter::prelude::*;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// A simulated service that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED (simulating transient error)", attempt + 1);
            Err(std::io::Error::other(format!(
                "Transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: Exponential jitter through the free function
fn example_exponential() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Exponential Jitter ===\n");

    let api = UnreliableApi::new(4);
    let start = Instant::now();

    let result = retry(5, Duration::from_millis(100), Duration::from_secs(3), || {
        api.call()
    })?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

/// Example 2: Decorrelated jitter, printing the delay walk
fn example_decorrelated() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Decorrelated Jitter ===\n");

    let backoff = Backoff::builder()
        .attempts(8)
        .min_delay(Duration::from_millis(50))
        .max_delay(Duration::from_secs(1))
        .jitter(Jitter::Decorrelated)
        .build();

    println!("Delays a fully failing run would sleep:");
    for (i, delay) in backoff.delays(&mut rand::thread_rng()).enumerate() {
        println!("  After attempt {}: {:?}", i + 1, delay);
    }

    let api = UnreliableApi::new(2);
    println!("\nCalling unreliable API (fails 2 times before succeeding)...");
    let result = backoff.execute(|| api.call())?;
    println!("\nResult: {}", result);

    Ok(())
}

/// Example 3: Non-blocking retries
async fn example_async() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Async Retry ===\n");

    let config = RetryConfig::default()
        .with_attempts(3)
        .with_delays(Duration::from_millis(10), Duration::from_millis(100));
    let backoff = config.backoff()?;

    let api = UnreliableApi::new(5);
    let result = backoff
        .execute_async(|| {
            let api = &api;
            async move { api.call() }
        })
        .await;

    match result {
        Ok(data) => println!("\nResult: {}", data),
        Err(err) => println!("\nGave up after {} attempts: {}", api.total_attempts(), err),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing so retry events are visible with `--features tracing`
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("backoff_jitter=debug".parse()?),
        )
        .init();

    println!("==============================================");
    println!("   Backoff Jitter: Retry Examples");
    println!("==============================================");

    example_exponential()?;
    example_decorrelated()?;
    example_async().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
