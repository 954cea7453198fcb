//! Exponential backoff retry for GitHub requests.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::debug;

use crate::error::GitHubError;

/// Configuration: 3 total attempts, base 1s, max 30s.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// How often and how patiently a request is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        }
    }
}

impl RetryPolicy {
    /// The default policy with a different attempt budget (at least one attempt).
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }
}

/// Retry a request with exponential backoff.
///
/// `attempt` is called up to `policy.max_attempts` times. Only transient errors
/// (see [`GitHubError::is_transient`]) are retried; anything else is returned
/// immediately. When every attempt fails, the last error is wrapped in
/// [`GitHubError::RetriesExhausted`].
pub async fn retry_with_backoff<T, Fut, F>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, GitHubError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitHubError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = ExponentialBackoff {
        initial_interval: policy.initial_interval,
        max_interval: policy.max_interval,
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_transient() {
            return Err(error);
        }

        if attempts >= max_attempts {
            if attempts == 1 {
                return Err(error);
            }
            return Err(GitHubError::RetriesExhausted {
                attempts,
                source: Box::new(error),
            });
        }

        if let Some(wait_duration) = backoff.next_backoff() {
            debug!(attempt = attempts, ?wait_duration, error = %error, "Retrying GitHub request");
            tokio::time::sleep(wait_duration).await;
        }
    }
}
