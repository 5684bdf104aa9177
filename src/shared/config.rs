//! Runtime configuration for the sync core.
//!
//! Every value has a default suited to the Jikan public API; `from_env`
//! overrides them from `MEDIA_SYNC_*` variables (a `.env` file is honoured).

use crate::log_info;
use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::time::Duration;

pub const DEFAULT_MIN_INTERVAL_MS: u64 = 350;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RATE_LIMIT_RETRY_DELAY_MS: u64 = 1500;
pub const DEFAULT_TRANSPORT_RETRY_DELAY_MS: u64 = 500;
pub const DEFAULT_JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";
pub const DEFAULT_USER_AGENT: &str = "media-sync/0.1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Throttling and retry settings for one rate-limited endpoint family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Minimum spacing between two dispatches
    pub min_interval: Duration,
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Back-off after a rate-limit (HTTP 429) response
    pub retry_delay: Duration,
    /// Back-off after a network error or timeout
    pub transport_retry_delay: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RATE_LIMIT_RETRY_DELAY_MS),
            transport_retry_delay: Duration::from_millis(DEFAULT_TRANSPORT_RETRY_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JikanConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for JikanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_JIKAN_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub queue: QueueConfig,
    pub jikan: JikanConfig,
    /// Enrichment calls an import may have outstanding in the queue at once
    pub import_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            jikan: JikanConfig::default(),
            import_concurrency: 1,
        }
    }
}

impl SyncConfig {
    /// Build configuration from the environment, falling back to defaults
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = QueueConfig::default();
        let queue = QueueConfig {
            min_interval: read_millis("MEDIA_SYNC_MIN_INTERVAL_MS")?
                .unwrap_or(defaults.min_interval),
            max_retries: read_bounded::<u32>("MEDIA_SYNC_MAX_RETRIES")?
                .unwrap_or(defaults.max_retries),
            retry_delay: read_millis("MEDIA_SYNC_RETRY_DELAY_MS")?
                .unwrap_or(defaults.retry_delay),
            transport_retry_delay: read_millis("MEDIA_SYNC_TRANSPORT_RETRY_DELAY_MS")?
                .unwrap_or(defaults.transport_retry_delay),
        };

        let jikan_defaults = JikanConfig::default();
        let jikan = JikanConfig {
            base_url: env::var("MEDIA_SYNC_JIKAN_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(jikan_defaults.base_url),
            user_agent: env::var("MEDIA_SYNC_USER_AGENT").unwrap_or(jikan_defaults.user_agent),
            request_timeout: read_number("MEDIA_SYNC_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(jikan_defaults.request_timeout),
        };

        let import_concurrency =
            read_bounded::<usize>("MEDIA_SYNC_IMPORT_CONCURRENCY")?.unwrap_or(1);
        if import_concurrency == 0 {
            return Err(AppError::ConfigError(
                "MEDIA_SYNC_IMPORT_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let config = Self {
            queue,
            jikan,
            import_concurrency,
        };
        log_info!(
            "Sync configuration loaded: min interval {:?}, {} retries, metadata at {}",
            config.queue.min_interval,
            config.queue.max_retries,
            config.jikan.base_url
        );
        Ok(config)
    }
}

fn read_number(key: &str) -> AppResult<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| AppError::ConfigError(format!("{} is not a valid number: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Like `read_number`, rejecting values that do not fit the target type
fn read_bounded<T: TryFrom<u64>>(key: &str) -> AppResult<Option<T>> {
    read_number(key)?
        .map(|n| {
            T::try_from(n)
                .map_err(|_| AppError::ConfigError(format!("{} is out of range: {}", key, n)))
        })
        .transpose()
}

fn read_millis(key: &str) -> AppResult<Option<Duration>> {
    Ok(read_number(key)?.map(Duration::from_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_defaults_match_public_api_limits() {
        let config = QueueConfig::default();
        assert_eq!(config.min_interval, Duration::from_millis(350));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_delay, Duration::from_millis(1500));
        assert_eq!(config.transport_retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        env::set_var("MEDIA_SYNC_TEST_BOGUS_NUMBER", "fast");
        let result = read_number("MEDIA_SYNC_TEST_BOGUS_NUMBER");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
        env::remove_var("MEDIA_SYNC_TEST_BOGUS_NUMBER");
    }

    #[test]
    fn oversized_retry_count_is_rejected() {
        env::set_var("MEDIA_SYNC_TEST_HUGE_RETRIES", "4294967296");
        let result = read_bounded::<u32>("MEDIA_SYNC_TEST_HUGE_RETRIES");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
        env::remove_var("MEDIA_SYNC_TEST_HUGE_RETRIES");
    }

    #[test]
    fn retry_count_within_range_is_read() {
        env::set_var("MEDIA_SYNC_TEST_FEW_RETRIES", "4");
        assert_eq!(read_bounded::<u32>("MEDIA_SYNC_TEST_FEW_RETRIES").unwrap(), Some(4));
        env::remove_var("MEDIA_SYNC_TEST_FEW_RETRIES");
    }

    #[test]
    fn missing_variable_reads_as_none() {
        assert_eq!(read_millis("MEDIA_SYNC_TEST_NEVER_SET").unwrap(), None);
    }
}
