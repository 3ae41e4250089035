use std::future::Future;
use std::time::Duration;

use crate::domain::{Dependency, DependencyError};

const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Per-dependency call policy: deadline for every attempt plus a bounded
/// number of attempts. `max_attempts == 1` disables retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            timeout,
            backoff: Duration::ZERO,
        }
    }

    pub fn with_attempts(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    /// Exponential backoff after the given failed attempt (1-based), capped.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

/// Runs `op` under `policy`. Each attempt is cancelled at the deadline and
/// reported as [`DependencyError::Timeout`]. Only retryable errors are retried.
pub async fn call_with_retry<T, F, Fut>(
    dependency: Dependency,
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, DependencyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DependencyError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(DependencyError::Timeout(
                dependency,
                policy.timeout.as_millis() as u64,
            )),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let wait = policy.delay_after(attempt);
                tracing::warn!(
                    dependency = %dependency,
                    attempt,
                    max_attempts = policy.max_attempts,
                    backoff_ms = wait.as_millis() as u64,
                    error = %e,
                    "retrying after transient failure"
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
}
