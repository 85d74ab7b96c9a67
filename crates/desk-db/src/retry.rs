//! Retry with exponential backoff for derived-violation writes.
//!
//! A committed check-in must not lose its violations to a transient store
//! error. Writes are retried a few times before the draft is handed to the
//! deferred queue.

use std::future::Future;
use std::time::Duration;

use desk_config::ViolationsConfig;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn from_config(config: &ViolationsConfig) -> Self {
        Self {
            max_attempts: config.retry_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            ..Self::default()
        }
    }

    /// Single attempt, no sleeping.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `op` until it succeeds or `config.max_attempts` is reached, sleeping
/// between attempts. Returns the last error.
///
/// # Errors
///
/// Returns the final attempt's error.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.max_attempts => {
                let delay = config.delay_for(attempt);
                tracing::warn!(
                    label,
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "write failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = RetryConfig {
            max_attempts: 6,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(300),
        };
        assert_eq!(config.delay_for(1), Duration::from_millis(50));
        assert_eq!(config.delay_for(2), Duration::from_millis(100));
        assert_eq!(config.delay_for(3), Duration::from_millis(200));
        assert_eq!(config.delay_for(4), Duration::from_millis(300));
        assert_eq!(config.delay_for(40), Duration::from_millis(300));
    }

    #[test]
    fn from_config_never_allows_zero_attempts() {
        let config = RetryConfig::from_config(&ViolationsConfig {
            retry_attempts: 0,
            ..Default::default()
        });
        assert_eq!(config.max_attempts, 1);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(&fast(3), "test", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 { Err(format!("fail {n}")) } else { Ok(n) }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = with_retry(&fast(2), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("nope".to_string())
        })
        .await;
        assert_eq!(result.unwrap_err(), "nope");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
