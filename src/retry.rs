//! Retry logic with exponential backoff for network operations.

use anyhow::Result;
use log::warn;
use std::time::Duration;

/// Backoff configuration for [`with_retry`].
///
/// State is per invocation: each call to [`with_retry`] starts from
/// `initial_delay` again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts before giving up. Must be at least 1;
    /// 1 means a single attempt with no retry.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after every failed attempt.
    /// Must be at least 1.0, so the delay never shrinks.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 13,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

/// Executes an async operation, retrying with exponential backoff.
///
/// Every error is treated as transient and retried identically; there is no
/// classification and no jitter. Each failed attempt (including the last one)
/// is logged at warn level. The error from the final attempt propagates to the
/// caller unmodified.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= policy.max_attempts {
                    warn!(
                        "{}: attempt {}/{} failed ({}), giving up",
                        operation_name, attempt, policy.max_attempts, e
                    );
                    return Err(e);
                }

                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:?}...",
                    operation_name, attempt, policy.max_attempts, e, delay
                );

                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.backoff_factor);
                attempt += 1;
            }
        }
    }
}
