//! Retry policy for provider calls.
//!
//! Rate-limit responses back off linearly (`rate_limit_backoff × attempt`),
//! every other retryable failure waits `transient_backoff`. Sleeping goes
//! through [`Sleeper`] so tests can observe the schedule without waiting.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{OpenAIError, Result};

/// Something that can pause the current task.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Bounded retry with backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,

    /// Base wait after a 429; multiplied by the attempt number.
    pub rate_limit_backoff: Duration,

    /// Wait after a timeout, network failure, 5xx or empty completion.
    pub transient_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: Duration::from_secs(10),
            transient_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Set the maximum number of attempts (clamped to at least one).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set both backoff durations.
    pub fn with_backoff(mut self, rate_limit: Duration, transient: Duration) -> Self {
        self.rate_limit_backoff = rate_limit;
        self.transient_backoff = transient;
        self
    }

    /// Delay before the attempt following `attempt` (1-based) that failed with `err`.
    pub fn backoff_for(&self, err: &OpenAIError, attempt: u32) -> Duration {
        match err {
            OpenAIError::RateLimited => self.rate_limit_backoff * attempt,
            _ => self.transient_backoff,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, sleeper: &dyn Sleeper, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= max_attempts {
                return Err(OpenAIError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff_for(&err, attempt);
            warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Provider call failed, retrying"
            );
            sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
