pub mod application;
pub mod domain;

// Re-exports for easy external access
pub use application::service::ImportService;
pub use domain::{DuplicateClassifier, EnrichmentService, ImportCoordinator, StatusMapper};

// Re-export common types for shorter imports
pub use domain::services::import_components::{
    DuplicateEntry, DuplicatePolicy, FailedEntry, ImportDocument, ImportEntry, ImportOptions,
    ImportOutcome, ImportProgress, ImportResult, ProgressCallback, SkippedEntry,
};
