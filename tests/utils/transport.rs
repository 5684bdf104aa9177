/// Scripted HTTP transport for queue and pipeline tests
///
/// Each target gets its own list of scripted replies, consumed in order;
/// once a script runs out the fallback reply is used. Every dispatch is
/// recorded with its (Tokio) timestamp so tests can check spacing.
use async_trait::async_trait;
use media_sync::modules::provider::{HttpTransport, QueuedRequest, TransportResponse};
use media_sync::shared::errors::{AppError, AppResult};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    /// Network-level failure
    Fail,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Reply::Status(200, body.into())
    }

    pub fn rate_limited() -> Self {
        Reply::Status(429, r#"{"status": 429, "message": "Too Many Requests"}"#.to_string())
    }
}

pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    fallback: Reply,
    latency: Duration,
    dispatches: Mutex<Vec<(String, Instant)>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::with_fallback(Reply::ok("{}"))
    }

    pub fn with_fallback(fallback: Reply) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback,
            latency: Duration::ZERO,
            dispatches: Mutex::new(Vec::new()),
        }
    }

    /// Each send takes `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn script(&self, target: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(target.to_string())
            .or_default()
            .extend(replies);
    }

    pub fn dispatches(&self) -> Vec<(String, Instant)> {
        self.dispatches.lock().unwrap().clone()
    }

    pub fn dispatched_targets(&self) -> Vec<String> {
        self.dispatches()
            .into_iter()
            .map(|(target, _)| target)
            .collect()
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatches.lock().unwrap().len()
    }

    /// Smallest gap between consecutive dispatches
    pub fn min_gap(&self) -> Option<Duration> {
        self.dispatches()
            .windows(2)
            .map(|pair| pair[1].1 - pair[0].1)
            .min()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &QueuedRequest) -> AppResult<TransportResponse> {
        self.dispatches
            .lock()
            .unwrap()
            .push((request.target.clone(), Instant::now()));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&request.target)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Status(status, body) => Ok(TransportResponse::new(status, body)),
            Reply::Fail => Err(AppError::TransportError("connection reset by peer".to_string())),
        }
    }
}
