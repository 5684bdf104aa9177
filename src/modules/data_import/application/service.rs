use crate::modules::library::RecordStore;
use crate::modules::provider::MetadataService;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;
use crate::{log_error, log_info};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::super::domain::services::import_components::{
    ImportCoordinator, ImportDocument, ImportEntry, ImportOptions, ImportResult, ProgressCallback,
    ProgressTracker,
};

/// Import service - single entry point for bulk imports
///
/// Delegates the work to the import components. It reads, classifies and
/// enriches but never writes: persisting the returned records is up to the
/// caller.
#[derive(Clone)]
pub struct ImportService {
    record_store: Arc<dyn RecordStore>,
    metadata_service: Arc<dyn MetadataService>,
}

impl ImportService {
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        metadata_service: Arc<dyn MetadataService>,
    ) -> Self {
        Self {
            record_store,
            metadata_service,
        }
    }

    /// Import a bulk export document.
    ///
    /// Fails only when the document cannot be decoded or parsed; every
    /// per-entry problem is reported inside the returned `ImportResult`.
    pub async fn import_document(
        &self,
        document: ImportDocument,
        options: ImportOptions,
        progress: Option<ProgressCallback>,
        cancellation: Option<CancellationToken>,
    ) -> AppResult<ImportResult> {
        let timer = TimedOperation::new("import_document");

        let entries = match ImportCoordinator::read_entries(&document) {
            Ok(entries) => entries,
            Err(e) => {
                log_error!(
                    "Rejected import document {}: {}",
                    document.file_name.as_deref().unwrap_or("<unnamed>"),
                    e
                );
                return Err(e);
            }
        };
        log_info!(
            "Read {} entries from {} ({} bytes)",
            entries.len(),
            document.file_name.as_deref().unwrap_or("<unnamed>"),
            document.bytes.len()
        );

        let coordinator =
            ImportCoordinator::new(self.record_store.clone(), self.metadata_service.clone());
        let result = coordinator
            .import_entries(
                entries,
                &options,
                &ProgressTracker::new(progress),
                &cancellation.unwrap_or_default(),
            )
            .await;

        timer.finish();
        Ok(result)
    }

    /// Parse a document without classifying or enriching it
    pub fn preview_document(&self, document: &ImportDocument) -> AppResult<Vec<ImportEntry>> {
        ImportCoordinator::read_entries(document)
    }
}
