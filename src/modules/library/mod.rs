pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{LibraryStatus, LocalRecord, MediaKind, RecordStore};
pub use infrastructure::InMemoryRecordStore;
