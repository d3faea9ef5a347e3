//! Retry configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempt budget and backoff for the download orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts with the normal profile before switching to the fallback.
    /// The fallback attempt comes on top of these.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Base delay in seconds; the wait after attempt `n` is `n * base`.
    #[serde(default = "default_delay_base")]
    pub delay_base_secs: u64,
}

fn default_attempts() -> u32 {
    3
}

fn default_delay_base() -> u64 {
    5
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_base_secs: default_delay_base(),
        }
    }
}

impl RetryConfig {
    /// Linear backoff: how long to wait after the given failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.delay_base_secs.saturating_mul(u64::from(attempt)))
    }
}
