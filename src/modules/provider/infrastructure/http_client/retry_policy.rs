//! Retry decisions for the throttled request queue
//!
//! Rate-limit responses and transport failures share one retry budget per
//! call but back off for different amounts of time.

use crate::shared::config::QueueConfig;
use std::time::Duration;

/// Why a dispatch did not produce a usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Server answered HTTP 429
    RateLimited,
    /// Network error or timeout before any response
    Transport,
}

impl FailureKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FailureKind::RateLimited => "HTTP 429",
            FailureKind::Transport => "transport failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first dispatch
    pub max_retries: u32,
    pub rate_limit_delay: Duration,
    pub transport_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            rate_limit_delay: config.retry_delay,
            transport_delay: config.transport_retry_delay,
        }
    }

    /// Back-off before the next attempt, or `None` once the budget is spent.
    ///
    /// `attempts` counts the retries already performed for the call.
    pub fn retry_delay(&self, attempts: u32, kind: FailureKind) -> Option<Duration> {
        if attempts >= self.max_retries {
            return None;
        }
        Some(match kind {
            FailureKind::RateLimited => self.rate_limit_delay,
            FailureKind::Transport => self.transport_delay,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&QueueConfig::default())
    }
}
