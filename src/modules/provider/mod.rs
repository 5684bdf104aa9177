pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{MediaMetadata, MetadataService};
pub use infrastructure::http_client::{
    CallHandle, HttpTransport, QueuedRequest, ReqwestTransport, TransportResponse,
};
pub use infrastructure::{JikanMetadataService, QueueStatus, ThrottledQueue};
