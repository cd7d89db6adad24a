use std::time::Duration;

use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// How often, and how patiently, a vote is re-applied after a retryable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one. Zero disables retrying.
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Jittered delays of roughly `2 * base`, `4 * base`, `8 * base`, ...
    /// capped at `max_delay`, one per permitted retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base_millis = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        ExponentialBackoff::from_millis(2)
            .factor(base_millis.max(1))
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries)
    }
}
