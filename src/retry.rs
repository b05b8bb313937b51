//! Bounded exponential-backoff retries
//!
//! Only errors classified temporary ([`Error::is_temporary`]) are retried.
//! Apply this to reads only: retrying a write after an ambiguous failure can
//! duplicate its side effects.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Total attempts (first call included)
pub const MAX_ATTEMPTS: u32 = 5;

/// Delay before the first retry
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound on any single delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Retry policy for temporary failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Cap on the delay between attempts
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
        }
    }

    /// A single attempt, never retried
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given number of failed attempts (0-based retry index)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        let delay = self
            .initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff);
        std::cmp::min(delay, self.max_backoff)
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy's
/// attempts are used up. The last temporary error is returned unchanged.
pub async fn with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_temporary() && attempt < max_attempts => {
                let delay = policy.backoff(attempt - 1);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:?}",
                    operation_name, attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_temporary() {
                    warn!(
                        "{}: giving up after {} attempts ({})",
                        operation_name, attempt, e
                    );
                } else {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                }
                return Err(e);
            }
        }
    }
}
