use log::{debug, error, info, warn};
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Install env_logger with crate-level defaults. Safe to call more than once;
/// `RUST_LOG` overrides the defaults.
pub fn init_logger() {
    INIT.call_once(|| {
        // try_init: the host application may already own the global logger
        let installed = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .filter_module("media_sync", log::LevelFilter::Debug)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("hyper", log::LevelFilter::Warn)
            .format_timestamp_millis()
            .format_target(false)
            .try_init()
            .is_ok();

        if installed {
            info!("media-sync logging initialized");
        }
    });
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// One-line log records for queue traffic and import runs
pub struct LogContext;

impl LogContext {
    /// A call left the queue for the transport
    pub fn queue_dispatch(queue: &str, target: &str, attempt: u32) {
        if attempt == 0 {
            debug!("[{}] -> {}", queue, target);
        } else {
            debug!("[{}] -> {} (attempt {})", queue, target, attempt + 1);
        }
    }

    /// The transport answered with a status the queue hands back as-is
    pub fn queue_response(queue: &str, target: &str, status: u16, elapsed: Duration) {
        info!("[{}] <- {} {} in {}ms", queue, target, status, elapsed.as_millis());
    }

    /// A failed call went back to the head of the queue
    pub fn queue_retry(
        queue: &str,
        target: &str,
        reason: &str,
        retry: u32,
        max_retries: u32,
        delay: Duration,
    ) {
        warn!(
            "[{}] {} on {}, retry {}/{} in {:?}",
            queue, reason, target, retry, max_retries, delay
        );
    }

    /// Retry budget spent; the caller gets the last error
    pub fn queue_gave_up(queue: &str, target: &str, attempts: u32, error: &dyn std::error::Error) {
        warn!(
            "[{}] giving up on {} after {} attempts: {}",
            queue, target, attempts, error
        );
    }

    pub fn entry_settled(settled: usize, expected: usize, title: &str) {
        info!("Import [{}/{}] settled '{}'", settled, expected, title);
    }

    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    pub fn stage_finished(stage: &str, elapsed: Duration, summary: Option<&str>) {
        match summary {
            Some(summary) => info!("{} finished in {}ms: {}", stage, elapsed.as_millis(), summary),
            None => debug!("{} finished in {}ms", stage, elapsed.as_millis()),
        }
    }
}

/// Wall-clock timer for a pipeline stage, logged when finished
pub struct TimedOperation {
    start: std::time::Instant,
    stage: &'static str,
}

impl TimedOperation {
    pub fn new(stage: &'static str) -> Self {
        debug!("{} started", stage);
        Self {
            start: std::time::Instant::now(),
            stage,
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        LogContext::stage_finished(self.stage, elapsed, None);
        elapsed
    }

    pub fn finish_with_info(self, summary: &str) -> Duration {
        let elapsed = self.start.elapsed();
        LogContext::stage_finished(self.stage, elapsed, Some(summary));
        elapsed
    }
}
