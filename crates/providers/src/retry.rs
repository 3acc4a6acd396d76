//! Retry with exponential backoff around a single fallible async call.
//!
//! Only transient failures (rate limiting, overload, transport hiccups) are
//! retried. Attempts are strictly sequential, and the delay before attempt
//! `i + 1` is `initial_delay * 2^i`, without jitter.

use std::future::Future;
use std::time::Duration;

use careerpath_core::error::ProviderError;
use tracing::{debug, warn};

/// An error that knows whether an unchanged retry could succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for ProviderError {
    fn is_transient(&self) -> bool {
        ProviderError::is_transient(self)
    }
}

/// How many times to try and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Quiz analysis: 3 attempts, 2s initial delay.
    pub fn analysis() -> Self {
        Self::new(3, Duration::from_secs(2))
    }

    /// Chat: 2 attempts, 2s initial delay.
    pub fn chat() -> Self {
        Self::new(2, Duration::from_secs(2))
    }

    /// Delay slept after the failed attempt with 0-based index `attempt_index`.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::analysis()
    }
}

/// Run `operation` until it succeeds, fails permanently, or runs out of attempts.
///
/// The caller sees exactly the last error observed.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.attempts();
    let mut attempt_index = 0;

    loop {
        debug!(attempt = attempt_index + 1, max_attempts, "Invoking provider");

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !err.is_transient() {
            debug!(error = %err, "Permanent failure, not retrying");
            return Err(err);
        }

        attempt_index += 1;
        if attempt_index >= max_attempts {
            warn!(error = %err, attempts = max_attempts, "Retries exhausted");
            return Err(err);
        }

        let delay = policy.delay_for(attempt_index - 1);
        warn!(
            error = %err,
            attempt = attempt_index,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            "Transient failure, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
