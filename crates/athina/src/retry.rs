//! Retry policy for API calls
//!
//! A fixed-delay policy with a small attempt budget. Which failures are
//! worth another attempt is decided by [`Error::is_retryable`].

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use crate::error::{Error, Result};

/// Fixed-delay retry policy.
///
/// # Default Configuration
///
/// - `max_attempts`: 2 (one retry)
/// - `delay`: 1s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Create a policy. An attempt budget of zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Maximum attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether `error`, raised on attempt number `attempt` (1-based),
    /// should be followed by another attempt.
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }

    /// Run `operation` until it succeeds, fails terminally, or the attempt
    /// budget is spent. The closure receives the 1-based attempt number.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if self.should_retry(&error, attempt) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %error,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 2);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::default();
        let transport = Error::Connection("reset".to_string());
        let client = Error::from_response(400, "{}");

        assert!(policy.should_retry(&transport, 1));
        assert!(!policy.should_retry(&transport, 2));
        assert!(!policy.should_retry(&client, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_after_max_attempts() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<()> = policy
            .run(move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::Connection("refused".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::Connection(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_recovers_on_second_attempt() {
        let policy = RetryPolicy::default();

        let result = policy
            .run(|attempt| async move {
                if attempt == 1 {
                    Err(Error::Timeout(Duration::from_secs(60)))
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_does_not_retry_terminal_errors() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<()> = policy
            .run(move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::from_response(401, r#"{"error": "bad key"}"#))
            })
            .await;

        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_fixed_delay() {
        let policy = RetryPolicy::new(2, Duration::from_secs(1));
        let start = tokio::time::Instant::now();

        let _: Result<()> = policy
            .run(|_| async { Err(Error::Connection("down".to_string())) })
            .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_secs(2));
    }
}
