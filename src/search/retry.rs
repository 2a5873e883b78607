//! Retry with exponential backoff for fallible async calls

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

/// How often and how patiently to retry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub delay: Duration,
    /// Multiplier applied to the delay after every retry
    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            backoff: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration, backoff: f64) -> Self {
        Self {
            max_attempts,
            delay,
            backoff,
        }
    }

    /// Sleeps taken between attempts when every attempt fails
    pub fn delays(&self) -> Vec<Duration> {
        let attempts = self.max_attempts.max(1);
        (0..attempts - 1)
            .map(|n| self.delay.mul_f64(self.backoff.powi(n as i32)))
            .collect()
    }
}

/// Run `op` until it succeeds, fails with an error `should_retry` rejects, or
/// runs out of attempts. The last error is returned.
pub async fn retry_async<T, E, F, Fut, P>(policy: RetryPolicy, should_retry: P, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && should_retry(&e) => {
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:.2}s",
                    attempt,
                    max_attempts,
                    e,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
                delay = delay.mul_f64(policy.backoff);
                attempt += 1;
            }
            Err(e) => {
                if attempt >= max_attempts && should_retry(&e) {
                    error!("All {} attempts failed: {}", max_attempts, e);
                }
                return Err(e);
            }
        }
    }
}
