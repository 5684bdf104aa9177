//! Synchronization core of a media-tracking library.
//!
//! Two pieces do the work: a [`ThrottledQueue`] that serializes calls to a
//! rate-limited metadata API, and an [`ImportService`] that turns a bulk list
//! export into classified, enriched library records. [`SyncCore`] wires both
//! from a [`SyncConfig`].

pub mod modules;
pub mod shared;

use modules::data_import::{
    ImportDocument, ImportOptions, ImportResult, ImportService, ProgressCallback,
};
use modules::library::RecordStore;
use modules::provider::{HttpTransport, JikanMetadataService, ReqwestTransport, ThrottledQueue};
use shared::errors::AppResult;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use shared::config::SyncConfig;
pub use shared::utils::logger::init_logger;

const METADATA_QUEUE: &str = "Jikan";

/// Queue, metadata service and import service sharing one request channel
#[derive(Clone)]
pub struct SyncCore {
    config: SyncConfig,
    queue: ThrottledQueue,
    import_service: ImportService,
}

impl SyncCore {
    /// Wire everything over a real HTTP client
    pub fn new(config: SyncConfig, record_store: Arc<dyn RecordStore>) -> AppResult<Self> {
        let transport =
            ReqwestTransport::new(config.jikan.user_agent.clone(), config.jikan.request_timeout)?;
        Ok(Self::with_transport(config, record_store, Arc::new(transport)))
    }

    pub fn with_transport(
        config: SyncConfig,
        record_store: Arc<dyn RecordStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let queue = ThrottledQueue::new(METADATA_QUEUE, config.queue.clone(), transport);
        let metadata_service = Arc::new(JikanMetadataService::new(
            queue.clone(),
            config.jikan.clone(),
        ));
        let import_service = ImportService::new(record_store, metadata_service);

        Self {
            config,
            queue,
            import_service,
        }
    }

    /// Build from `MEDIA_SYNC_*` environment variables
    pub fn from_env(record_store: Arc<dyn RecordStore>) -> AppResult<Self> {
        Self::new(SyncConfig::from_env()?, record_store)
    }

    pub fn queue(&self) -> &ThrottledQueue {
        &self.queue
    }

    pub fn import_service(&self) -> &ImportService {
        &self.import_service
    }

    /// Import options for `scope` with the configured concurrency
    pub fn import_options(&self, scope: &str) -> ImportOptions {
        ImportOptions::new(scope).with_concurrency(self.config.import_concurrency)
    }

    pub async fn import_document(
        &self,
        document: ImportDocument,
        options: ImportOptions,
        progress: Option<ProgressCallback>,
        cancellation: Option<CancellationToken>,
    ) -> AppResult<ImportResult> {
        self.import_service
            .import_document(document, options, progress, cancellation)
            .await
    }
}
