//! Retry with exponential backoff for collaborator calls.
//!
//! Only failures the caller marks as transient are retried. Everything else
//! returns on the first attempt.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// How often and how patiently to retry.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first call included
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub initial_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,

    /// Growth factor between delays
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default backoff with a given attempt limit. Zero is treated as one.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// A single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            exponential_base: 1.0,
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(
            (delay.as_secs_f64() * self.exponential_base).min(self.max_delay.as_secs_f64()),
        )
    }
}

/// Run `f` until it succeeds, fails with an error `is_retryable` rejects, or
/// the attempt limit runs out. The last error is returned.
///
/// # Example
///
/// ```rust,no_run
/// use orgmgr_clients::retry::{with_retry_if, RetryConfig};
///
/// #[derive(Debug)]
/// enum CallError {
///     Timeout,
///     Rejected,
/// }
///
/// async fn example() -> Result<(), CallError> {
///     with_retry_if(
///         &RetryConfig::default(),
///         || async { Err(CallError::Timeout) },
///         |err| matches!(err, CallError::Timeout),
///     )
///     .await
/// }
/// ```
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    mut f: F,
    mut is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
    P: FnMut(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, "Call succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if !is_retryable(&e) => {
                debug!(error = ?e, "Error is not retryable");
                return Err(e);
            }
            Err(e) if attempt >= config.max_attempts => {
                error!(attempts = attempt, error = ?e, "Retry attempts exhausted");
                return Err(e);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = ?e,
                    "Call failed, retrying"
                );
                sleep(delay).await;
                delay = config.next_delay(delay);
            }
        }
    }
}
