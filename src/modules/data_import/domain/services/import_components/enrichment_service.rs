use crate::log_warn;
use crate::modules::library::LocalRecord;
use crate::modules::provider::{MediaMetadata, MetadataService};
use crate::shared::utils::logger::{LogContext, TimedOperation};

use std::sync::Arc;

use super::status_mapper::StatusMapper;
use super::types::ImportEntry;

/// Builds library records for new entries, filling descriptive fields from
/// the metadata service when it answers
#[derive(Clone)]
pub struct EnrichmentService {
    metadata_service: Arc<dyn MetadataService>,
}

impl EnrichmentService {
    pub fn new(metadata_service: Arc<dyn MetadataService>) -> Self {
        Self { metadata_service }
    }

    /// Record built from the export alone
    pub fn base_record(entry: &ImportEntry) -> LocalRecord {
        let mut record = LocalRecord::new(&entry.external_id, &entry.title, entry.kind);
        record.current_progress = entry.current_progress;
        record.total_progress = entry.total_progress;
        record.status = StatusMapper::map(&entry.source_status);
        record.score = entry.score;
        record
    }

    /// Build the record for `entry`, enriched when possible.
    ///
    /// Lookup failures of any kind (rate limit exhausted, transport, not found,
    /// unparseable body) degrade to the unenriched record. The entry is never
    /// lost over enrichment.
    pub async fn enrich(&self, entry: &ImportEntry) -> LocalRecord {
        let timer = TimedOperation::new("enrich_entry");
        let mut record = Self::base_record(entry);

        match self
            .metadata_service
            .fetch_by_identifier(&entry.external_id, entry.kind)
            .await
        {
            Ok(metadata) => {
                Self::apply(&mut record, metadata);
                timer.finish();
            }
            Err(e) => {
                if e.is_request_failure() {
                    log_warn!(
                        "Metadata request for '{}' failed, importing without enrichment: {}",
                        entry.title,
                        e
                    );
                } else {
                    LogContext::error_with_context(
                        &e,
                        &format!("Metadata lookup for '{}' ({})", entry.title, entry.external_id),
                    );
                }
                timer.finish_with_info("degraded");
            }
        }

        record
    }

    /// Merge fetched metadata into a record.
    ///
    /// The service's title and image replace the export's. The service's
    /// total is used only when the export had none. Progress is never
    /// clamped against the total.
    pub fn apply(record: &mut LocalRecord, metadata: MediaMetadata) {
        if let Some(title) = metadata.title.filter(|t| !t.trim().is_empty()) {
            record.title = title;
        }
        if metadata.image_url.is_some() {
            record.image_url = metadata.image_url;
        }
        if record.total_progress.is_none() {
            record.total_progress = metadata.total_progress;
        }
        record.synopsis = metadata.synopsis.or(record.synopsis.take());
        if !metadata.genres.is_empty() {
            record.genres = metadata.genres;
        }
        record.year = metadata.year.or(record.year);
        record.rank = metadata.rank.or(record.rank);
        record.popularity = metadata.popularity.or(record.popularity);
        record.source_medium = metadata.source_medium.or(record.source_medium.take());
        record.enriched = true;
    }
}
