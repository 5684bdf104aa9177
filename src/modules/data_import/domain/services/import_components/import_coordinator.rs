use crate::log_info;
use crate::modules::library::RecordStore;
use crate::modules::provider::MetadataService;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;

use super::document_decoder::{DocumentDecoder, ImportDocument};
use super::duplicate_classifier::{Classification, DuplicateClassifier};
use super::enrichment_service::EnrichmentService;
use super::export_parser::ExportParser;
use super::progress_tracker::ProgressTracker;
use super::types::{
    FailedEntry, ImportEntry, ImportOptions, ImportOutcome, ImportResult, SkippedEntry,
};
use futures::{stream, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const CANCELLED_REASON: &str = "Import cancelled";

/// Orchestrates the import workflow using focused components
#[derive(Clone)]
pub struct ImportCoordinator {
    classifier: DuplicateClassifier,
    enrichment: EnrichmentService,
}

impl ImportCoordinator {
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        metadata_service: Arc<dyn MetadataService>,
    ) -> Self {
        Self {
            classifier: DuplicateClassifier::new(record_store),
            enrichment: EnrichmentService::new(metadata_service),
        }
    }

    /// Decode and parse a document into entries. The only fallible stage.
    pub fn read_entries(document: &ImportDocument) -> AppResult<Vec<ImportEntry>> {
        let text = DocumentDecoder::decode(document)?;
        ExportParser::parse(&text)
    }

    /// Settle every entry and aggregate the outcomes in input order.
    ///
    /// Up to `options.enrichment_concurrency` entries are in progress at
    /// once; the shared request queue still dispatches their lookups one at a
    /// time.
    pub async fn import_entries(
        &self,
        entries: Vec<ImportEntry>,
        options: &ImportOptions,
        progress: &ProgressTracker,
        cancellation: &CancellationToken,
    ) -> ImportResult {
        let timer = TimedOperation::new("import_entries");
        let expected = entries.len();
        let concurrency = options.enrichment_concurrency.max(1);

        log_info!(
            "Importing {} entries into '{}' (policy {:?}, concurrency {})",
            expected,
            options.scope,
            options.duplicate_policy,
            concurrency
        );

        let repeated = DuplicateClassifier::repeated_positions(&entries);
        let mut outcomes = stream::iter(entries.into_iter().enumerate())
            .map(|(position, entry)| {
                let is_repeat = repeated.contains(&position);
                self.settle_entry(entry, is_repeat, options, cancellation)
            })
            .buffered(concurrency);

        let mut result = ImportResult::default();
        while let Some(outcome) = outcomes.next().await {
            let title = outcome.title().to_string();
            result.push(outcome);
            progress.entry_completed(&result, expected, &title);
        }

        timer.finish_with_info(&format!(
            "{} imported ({} enriched), {} duplicates, {} errors, {} skipped",
            result.imported.len(),
            result.enriched_count(),
            result.duplicates.len(),
            result.errors.len(),
            result.skipped_count()
        ));
        result
    }

    /// Produce the single outcome of one entry
    async fn settle_entry(
        &self,
        entry: ImportEntry,
        is_repeat: bool,
        options: &ImportOptions,
        cancellation: &CancellationToken,
    ) -> ImportOutcome {
        if cancellation.is_cancelled() {
            return skipped(entry, CANCELLED_REASON);
        }
        if !options.accepts(entry.kind) {
            let reason = format!("{} entries were not selected for import", entry.kind);
            return skipped(entry, reason);
        }
        if is_repeat {
            return ImportOutcome::Error(FailedEntry {
                reason: format!(
                    "{} {} appears more than once in the document",
                    entry.kind, entry.external_id
                ),
                entry,
            });
        }

        let entry = match self
            .classifier
            .classify(&options.scope, options.duplicate_policy, entry)
            .await
        {
            Classification::New(entry) => entry,
            Classification::Duplicate(duplicate) => return ImportOutcome::Duplicate(duplicate),
            Classification::Rejected(failed) => return ImportOutcome::Error(failed),
        };

        tokio::select! {
            _ = cancellation.cancelled() => skipped(entry, CANCELLED_REASON),
            record = self.enrichment.enrich(&entry) => ImportOutcome::Imported { record },
        }
    }
}

fn skipped(entry: ImportEntry, reason: impl Into<String>) -> ImportOutcome {
    ImportOutcome::Skipped(SkippedEntry {
        entry,
        reason: reason.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::data_import::domain::services::import_components::{
        DuplicatePolicy, ImportProgress, ProgressCallback,
    };
    use crate::modules::library::domain::MockRecordStore;
    use crate::modules::library::{LocalRecord, MediaKind};
    use crate::modules::provider::domain::MockMetadataService;
    use crate::modules::provider::MediaMetadata;
    use crate::shared::errors::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    fn entry(id: &str, title: &str, kind: MediaKind) -> ImportEntry {
        ImportEntry {
            external_id: id.to_string(),
            title: title.to_string(),
            kind,
            current_progress: 1,
            total_progress: None,
            source_status: "Watching".to_string(),
            score: None,
        }
    }

    fn coordinator(store: MockRecordStore, metadata: MockMetadataService) -> ImportCoordinator {
        ImportCoordinator::new(Arc::new(store), Arc::new(metadata))
    }

    fn empty_store() -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store.expect_find_by_identifier().returning(|_, _| Ok(None));
        store
    }

    fn echo_metadata() -> MockMetadataService {
        let mut metadata = MockMetadataService::new();
        metadata.expect_fetch_by_identifier().returning(|id, _| {
            Ok(MediaMetadata {
                title: Some(format!("Title {}", id)),
                ..Default::default()
            })
        });
        metadata
    }

    #[tokio::test]
    async fn every_entry_gets_one_outcome() {
        let mut store = MockRecordStore::new();
        store.expect_find_by_identifier().returning(|_, id| match id {
            "2" => Ok(Some(LocalRecord::new("2", "Known", MediaKind::Anime))),
            "3" => Err(AppError::StoreError("down".to_string())),
            _ => Ok(None),
        });
        let coordinator = coordinator(store, echo_metadata());

        let entries = vec![
            entry("1", "New", MediaKind::Anime),
            entry("2", "Known", MediaKind::Anime),
            entry("3", "Broken", MediaKind::Anime),
            entry("1", "New again", MediaKind::Anime),
        ];
        let result = coordinator
            .import_entries(
                entries,
                &ImportOptions::new("alice"),
                &ProgressTracker::default(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.total, 4);
        assert_eq!(result.imported.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.errors.len(), 2);
        assert!(result.is_consistent());
        assert_eq!(result.imported[0].title, "Title 1");
    }

    #[tokio::test]
    async fn filtered_kinds_are_skipped_without_lookups() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_by_identifier()
            .times(1)
            .returning(|_, _| Ok(None));
        let coordinator = coordinator(store, echo_metadata());

        let result = coordinator
            .import_entries(
                vec![
                    entry("1", "Anime", MediaKind::Anime),
                    entry("2", "Manga", MediaKind::Manga),
                ],
                &ImportOptions::new("alice").only_kinds(vec![MediaKind::Anime]),
                &ProgressTracker::default(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.imported.len(), 1);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(result.skipped[0].entry.kind, MediaKind::Manga);
    }

    #[tokio::test]
    async fn cancelled_import_skips_everything() {
        let coordinator = coordinator(MockRecordStore::new(), MockMetadataService::new());
        let token = CancellationToken::new();
        token.cancel();

        let result = coordinator
            .import_entries(
                vec![
                    entry("1", "A", MediaKind::Anime),
                    entry("2", "B", MediaKind::Anime),
                ],
                &ImportOptions::new("alice"),
                &ProgressTracker::default(),
                &token,
            )
            .await;

        assert_eq!(result.total, 2);
        assert_eq!(result.skipped_count(), 2);
        assert!(result.skipped.iter().all(|s| s.reason == CANCELLED_REASON));
    }

    #[tokio::test]
    async fn duplicate_carries_policy() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_by_identifier()
            .returning(|_, _| Ok(Some(LocalRecord::new("1", "Known", MediaKind::Anime))));
        let coordinator = coordinator(store, MockMetadataService::new());

        let result = coordinator
            .import_entries(
                vec![entry("1", "Known", MediaKind::Anime)],
                &ImportOptions::new("alice").with_policy(DuplicatePolicy::Overwrite),
                &ProgressTracker::default(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.duplicates[0].policy, DuplicatePolicy::Overwrite);
        assert!(result.duplicates[0].candidate.is_some());
    }

    #[tokio::test]
    async fn order_is_kept_with_concurrency() {
        let coordinator = coordinator(empty_store(), echo_metadata());
        let entries: Vec<_> = (0..8)
            .map(|i| entry(&i.to_string(), "x", MediaKind::Anime))
            .collect();

        let result = coordinator
            .import_entries(
                entries,
                &ImportOptions::new("alice").with_concurrency(4),
                &ProgressTracker::default(),
                &CancellationToken::new(),
            )
            .await;

        let ids: Vec<_> = result.imported.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
    }

    /// Metadata service whose lookup for one identifier takes a while
    struct SlowLookup {
        slow_id: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl MetadataService for SlowLookup {
        async fn fetch_by_identifier(
            &self,
            external_id: &str,
            _kind: MediaKind,
        ) -> AppResult<MediaMetadata> {
            if external_id == self.slow_id {
                tokio::time::sleep(self.delay).await;
            }
            Ok(MediaMetadata::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_enrichment_does_not_let_later_entries_overtake() {
        let mut store = MockRecordStore::new();
        store.expect_find_by_identifier().returning(|_, id| match id {
            "2" => Ok(Some(LocalRecord::new("2", "Dup", MediaKind::Anime))),
            _ => Ok(None),
        });
        let coordinator = ImportCoordinator::new(
            Arc::new(store),
            Arc::new(SlowLookup {
                slow_id: "1",
                delay: Duration::from_millis(100),
            }),
        );

        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let callback: ProgressCallback = Arc::new(move |progress: ImportProgress| {
            sink.lock().unwrap().push(progress.message);
        });

        let result = coordinator
            .import_entries(
                vec![
                    entry("1", "New", MediaKind::Anime),
                    entry("2", "Dup", MediaKind::Anime),
                    entry("3", "Fast", MediaKind::Anime),
                ],
                &ImportOptions::new("alice").with_concurrency(3),
                &ProgressTracker::new(Some(callback)),
                &CancellationToken::new(),
            )
            .await;

        let ids: Vec<_> = result.imported.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(
            *messages.lock().unwrap(),
            vec![
                "Processed 'New'".to_string(),
                "Processed 'Dup'".to_string(),
                "Processed 'Fast'".to_string(),
            ]
        );
    }

    #[test]
    fn unreadable_document_fails_whole_import() {
        let document = ImportDocument::from_text("not xml at all");
        assert!(matches!(
            ImportCoordinator::read_entries(&document),
            Err(AppError::MalformedDocument(_))
        ));
    }
}
