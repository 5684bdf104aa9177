pub mod services;

// Re-exports for easy access
pub use services::import_components::{
    DuplicateClassifier, EnrichmentService, ExportParser, ImportCoordinator, ProgressTracker,
    StatusMapper,
};
