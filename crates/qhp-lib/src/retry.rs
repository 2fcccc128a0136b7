//! Bounded retry of quote store fetches.

use qhp_fetch::{FetchError, QuoteClient, Transport};
use qhp_types::{BarSeries, DateRange, Timeframe};
use std::time::Duration;
use tracing::warn;

/// How often and how patiently a failed fetch is repeated.
///
/// Only timeouts and transport failures are retried; a remote error or a
/// malformed payload is returned at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between attempts (in milliseconds).
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without waiting.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::immediate(1)
    }

    /// Returns the delay before retry number `attempt` (1-based).
    ///
    /// The delay doubles per attempt up to `max_delay_ms`, with a
    /// deterministic jitter of up to ±25% and a floor of 100ms. A zero base
    /// delay disables waiting entirely.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if self.base_delay_ms == 0 {
            return Duration::ZERO;
        }

        let exp_delay = self.base_delay_ms.saturating_mul(1u64 << attempt.min(10));
        let capped = exp_delay.min(self.max_delay_ms);

        let jitter_range = capped / 4;
        let delay = if jitter_range > 0 {
            let offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            (capped + offset).saturating_sub(jitter_range)
        } else {
            capped
        };
        Duration::from_millis(delay.max(100))
    }

    /// Fetches one series, repeating retryable failures.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts run out, or the first
    /// non-retryable error.
    pub async fn fetch<T: Transport>(
        &self,
        client: &mut QuoteClient<T>,
        symbol: &str,
        range: &DateRange,
        timeframe: Timeframe,
    ) -> Result<BarSeries, FetchError> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match client.fetch(symbol, range, timeframe).await {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(symbol, attempt, max_attempts, error = %e, "fetch failed, retrying");
                    tokio::time::sleep(self.backoff_delay(attempt)).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
