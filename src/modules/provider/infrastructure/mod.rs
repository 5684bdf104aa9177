pub mod external;
pub mod http_client;

// Re-export commonly used types
pub use external::JikanMetadataService;
pub use http_client::{QueueStatus, ThrottledQueue};
