// Shared kernel: configuration, error types and utilities used by every module

pub mod config;
pub mod errors;
pub mod utils;

// Re-exports for convenience
pub use config::{JikanConfig, QueueConfig, SyncConfig};
pub use errors::{AppError, AppResult};
