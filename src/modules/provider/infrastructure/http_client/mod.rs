pub mod retry_policy;
pub mod throttled_queue;
pub mod transport;

pub use retry_policy::{FailureKind, RetryPolicy};
pub use throttled_queue::{CallHandle, QueueStatus, ThrottledQueue};
pub use transport::{
    HttpMethod, HttpTransport, QueuedRequest, ReqwestTransport, RequestOptions, TransportResponse,
};
