//! Bounded exponential backoff for rate limited and transient failures

use crate::config::RetrySettings;
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how long to wait before re-issuing a failed request.
///
/// Only errors for which [`AppError::is_retryable`] holds are retried. The
/// request is re-issued unchanged, so a rate limited page is fetched again
/// rather than skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Pause after a server error before the caller moves on
    pub server_error_skip_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        RetryPolicy {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            server_error_skip_delay: Duration::from_millis(settings.server_error_skip_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy without any waiting, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            server_error_skip_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based): the initial delay doubled
    /// for each earlier retry. A `Retry-After` value from the server replaces
    /// the computed delay. Either way the wait never exceeds `max_delay`.
    pub fn delay_for(&self, retry: u32, error: &AppError) -> Duration {
        if let Some(seconds) = error.retry_delay_seconds() {
            return Duration::from_secs(seconds).min(self.max_delay);
        }

        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. Running out of attempts yields
    /// `AppError::RetriesExhausted` wrapping the last failure.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    if attempt >= self.max_attempts {
                        warn!(
                            "Giving up on {} after {} attempts: {}",
                            operation, attempt, e
                        );
                        return Err(AppError::retries_exhausted(operation, attempt, e));
                    }

                    let wait = self.delay_for(attempt, &e);
                    if e.is_rate_limited() {
                        warn!(
                            "Rate limit reached for {}. Waiting {:?} before retrying (attempt {}/{})",
                            operation,
                            wait,
                            attempt + 1,
                            self.max_attempts
                        );
                    } else {
                        warn!(
                            "Transient error for {}: {}. Retrying in {:?} (attempt {}/{})",
                            operation,
                            e,
                            wait,
                            attempt + 1,
                            self.max_attempts
                        );
                    }
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
