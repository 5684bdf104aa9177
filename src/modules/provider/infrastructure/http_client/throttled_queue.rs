//! Serialized, rate-limited request queue for one remote endpoint family
//!
//! Every call to a throttled API goes through a single worker task, so there
//! is never more than one request in flight and consecutive dispatches are at
//! least `min_interval` apart. Rate-limit (HTTP 429) and transport failures
//! are retried a bounded number of times; a retried call goes back to the
//! head of the queue so it keeps its place ahead of later submissions.

use super::retry_policy::{FailureKind, RetryPolicy};
use super::transport::{HttpTransport, QueuedRequest, TransportResponse};
use crate::shared::config::QueueConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::shared::utils::RateLimiter;
use crate::{log_debug, log_info, log_warn};
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

/// One pending invocation, owned by the queue until it is resolved,
/// rejected or cleared.
struct QueuedCall {
    request: QueuedRequest,
    /// Retries already performed
    attempts: u32,
    completion: oneshot::Sender<AppResult<TransportResponse>>,
}

impl QueuedCall {
    fn resolve(self, result: AppResult<TransportResponse>) {
        // The caller may have dropped its handle; nothing left to notify then
        let _ = self.completion.send(result);
    }
}

#[derive(Default)]
struct QueueState {
    calls: VecDeque<QueuedCall>,
    /// Whether a worker task is currently draining the queue
    processing: bool,
}

struct QueueInner {
    name: String,
    state: Mutex<QueueState>,
    transport: Arc<dyn HttpTransport>,
    limiter: RateLimiter,
    retry_policy: RetryPolicy,
}

/// Snapshot returned by [`ThrottledQueue::status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// Calls waiting for dispatch (the in-flight call is not counted)
    pub pending: usize,
    /// Whether the worker loop is running
    pub active: bool,
}

/// Completion handle for a submitted call.
///
/// Resolves with the response, or with `RateLimitExceeded`, the underlying
/// transport error, or `QueueCleared`.
pub struct CallHandle {
    receiver: oneshot::Receiver<AppResult<TransportResponse>>,
}

impl Future for CallHandle {
    type Output = AppResult<TransportResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(AppError::QueueStopped)))
    }
}

/// Shared handle to a throttled request queue.
///
/// Construct one per rate-limited endpoint family and clone the handle into
/// every component that needs it; clones share the same queue and worker.
#[derive(Clone)]
pub struct ThrottledQueue {
    inner: Arc<QueueInner>,
}

impl ThrottledQueue {
    pub fn new(name: &str, config: QueueConfig, transport: Arc<dyn HttpTransport>) -> Self {
        log_info!(
            "{} request queue: min interval {:?}, {} retries",
            name,
            config.min_interval,
            config.max_retries
        );
        Self {
            inner: Arc::new(QueueInner {
                name: name.to_string(),
                state: Mutex::new(QueueState::default()),
                transport,
                limiter: RateLimiter::with_interval(config.min_interval),
                retry_policy: RetryPolicy::from_config(&config),
            }),
        }
    }

    /// Enqueue a call at the tail and return its completion handle.
    ///
    /// Never blocks. The worker task is started on the current Tokio runtime
    /// if it is not already running; outside a runtime the handle resolves
    /// immediately with `QueueStopped`.
    pub fn submit(&self, request: QueuedRequest) -> CallHandle {
        let (completion, receiver) = oneshot::channel();
        let handle = CallHandle { receiver };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log_warn!(
                    "{} queue: submit outside a Tokio runtime, rejecting {}",
                    self.inner.name,
                    request.target
                );
                let _ = completion.send(Err(AppError::QueueStopped));
                return handle;
            }
        };

        let start_worker = {
            let mut state = self.inner.lock_state();
            state.calls.push_back(QueuedCall {
                request,
                attempts: 0,
                completion,
            });
            !std::mem::replace(&mut state.processing, true)
        };

        if start_worker {
            let inner = Arc::clone(&self.inner);
            runtime.spawn(inner.process());
        }

        handle
    }

    /// Submit and wait for the outcome
    pub async fn fetch(&self, request: QueuedRequest) -> AppResult<TransportResponse> {
        self.submit(request).await
    }

    /// Reject every call still waiting for dispatch with `QueueCleared`.
    ///
    /// A call already in flight is not affected. Returns the number of calls
    /// removed.
    pub fn clear(&self) -> usize {
        let cleared: Vec<QueuedCall> = {
            let mut state = self.inner.lock_state();
            state.calls.drain(..).collect()
        };

        let count = cleared.len();
        for call in cleared {
            call.resolve(Err(AppError::QueueCleared));
        }
        if count > 0 {
            log_info!("{} queue cleared: {} calls rejected", self.inner.name, count);
        }
        count
    }

    pub fn status(&self) -> QueueStatus {
        let state = self.inner.lock_state();
        QueueStatus {
            pending: state.calls.len(),
            active: state.processing,
        }
    }
}

impl QueueInner {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        // The state is plain data; a panic elsewhere cannot leave it half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker loop: drains the queue one call at a time, then exits
    async fn process(self: Arc<Self>) {
        log_debug!("{} queue worker started", self.name);

        loop {
            let call = {
                let mut state = self.lock_state();
                match state.calls.pop_front() {
                    Some(call) => call,
                    None => {
                        state.processing = false;
                        break;
                    }
                }
            };

            if call.completion.is_closed() {
                log_debug!(
                    "{} queue: caller abandoned {}, skipping dispatch",
                    self.name,
                    call.request.target
                );
                continue;
            }

            self.limiter.wait().await;
            self.dispatch(call).await;
        }

        log_debug!("{} queue worker idle", self.name);
    }

    async fn dispatch(&self, call: QueuedCall) {
        LogContext::queue_dispatch(&self.name, &call.request.target, call.attempts);
        let started = Instant::now();

        match self.transport.send(&call.request).await {
            Ok(response) if response.is_rate_limited() => {
                let error = AppError::RateLimitExceeded(format!(
                    "{} rate limit exceeded after {} attempts",
                    self.name,
                    call.attempts + 1
                ));
                self.retry_or_reject(call, FailureKind::RateLimited, error)
                    .await;
            }
            Ok(response) => {
                LogContext::queue_response(
                    &self.name,
                    &call.request.target,
                    response.status,
                    started.elapsed(),
                );
                call.resolve(Ok(response));
            }
            Err(error) => {
                self.retry_or_reject(call, FailureKind::Transport, error)
                    .await;
            }
        }
    }

    async fn retry_or_reject(&self, mut call: QueuedCall, kind: FailureKind, error: AppError) {
        match self.retry_policy.retry_delay(call.attempts, kind) {
            Some(delay) => {
                call.attempts += 1;
                LogContext::queue_retry(
                    &self.name,
                    &call.request.target,
                    kind.describe(),
                    call.attempts,
                    self.retry_policy.max_retries,
                    delay,
                );
                self.lock_state().calls.push_front(call);
                sleep(delay).await;
            }
            None => {
                LogContext::queue_gave_up(
                    &self.name,
                    &call.request.target,
                    call.attempts + 1,
                    &error,
                );
                call.resolve(Err(error));
            }
        }
    }
}
