//! Retry policy for connection-level failures.

use std::time::Duration;

use curlew_transport::TransportError;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// How often, and how patiently, a failed transfer is attempted again.
///
/// Only errors reporting [`TransportError::is_transient`] are retried: DNS,
/// connect, send/receive failures and timeouts. HTTP errors and malformed
/// URLs fail on the first attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one (default: 0).
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each following one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Whether a failure on retry number `retry_count` (0 = the first
    /// attempt failed) deserves another attempt.
    pub fn should_retry(&self, retry_count: u32, err: &TransportError) -> bool {
        retry_count < self.max_retries && err.is_transient()
    }

    /// Delay before retry number `retry_count`.
    pub fn delay(&self, retry_count: u32) -> Duration {
        retry_delay(retry_count, self.base_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

/// Exponential backoff: `base * 2^retry_count`, saturating instead of overflowing.
///
/// ```
/// use std::time::Duration;
/// use curlew::retry::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(100)), Duration::from_millis(100));
/// assert_eq!(retry_delay(2, Duration::from_millis(100)), Duration::from_millis(400));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry_count))
}
