pub mod document_decoder;
pub mod duplicate_classifier;
pub mod enrichment_service;
pub mod export_parser;
pub mod import_coordinator;
pub mod progress_tracker;
pub mod status_mapper;
pub mod types;

// Re-export main types for public API
pub use document_decoder::{DocumentDecoder, ImportDocument};
pub use duplicate_classifier::{Classification, DuplicateClassifier};
pub use enrichment_service::EnrichmentService;
pub use export_parser::ExportParser;
pub use import_coordinator::ImportCoordinator;
pub use progress_tracker::{ProgressCallback, ProgressTracker};
pub use status_mapper::StatusMapper;
pub use types::*;
