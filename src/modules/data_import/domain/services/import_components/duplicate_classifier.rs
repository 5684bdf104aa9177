use crate::modules::library::{LocalRecord, RecordStore};
use crate::shared::errors::AppError;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_warn};

use std::collections::HashSet;
use std::sync::Arc;

use super::status_mapper::StatusMapper;
use super::types::{DuplicateEntry, DuplicatePolicy, FailedEntry, ImportEntry};

/// Checks parsed entries against the caller's existing library
#[derive(Clone)]
pub struct DuplicateClassifier {
    record_store: Arc<dyn RecordStore>,
}

/// Result of checking one entry against the store
#[derive(Debug)]
pub enum Classification {
    /// Not in the library yet; continue to enrichment
    New(ImportEntry),
    Duplicate(DuplicateEntry),
    Rejected(FailedEntry),
}

impl DuplicateClassifier {
    pub fn new(record_store: Arc<dyn RecordStore>) -> Self {
        Self { record_store }
    }

    /// Look the entry up by identifier within `scope`.
    ///
    /// A match of the same kind is a duplicate. A match of the other kind
    /// means the identifier is already taken in the library, which the import
    /// cannot resolve and reports as an error. Store failures are per-entry
    /// errors and never abort the batch.
    pub async fn classify(
        &self,
        scope: &str,
        policy: DuplicatePolicy,
        entry: ImportEntry,
    ) -> Classification {
        let timer = TimedOperation::new("classify_entry");

        let lookup = self
            .record_store
            .find_by_identifier(scope, &entry.external_id)
            .await;

        let classification = match lookup {
            Ok(None) => Classification::New(entry),
            Ok(Some(existing)) if existing.kind == entry.kind => {
                log_debug!(
                    "'{}' ({} {}) already in library '{}'",
                    entry.title,
                    entry.kind,
                    entry.external_id,
                    scope
                );
                let candidate = Self::resolution_candidate(&existing, &entry, policy);
                Classification::Duplicate(DuplicateEntry {
                    existing,
                    entry,
                    policy,
                    candidate,
                })
            }
            Ok(Some(existing)) => {
                log_warn!(
                    "Identifier {} of '{}' is already used by {} '{}'",
                    entry.external_id,
                    entry.title,
                    existing.kind,
                    existing.title
                );
                let reason = format!(
                    "Identifier {} collides with existing {} '{}'",
                    entry.external_id, existing.kind, existing.title
                );
                Classification::Rejected(FailedEntry { entry, reason })
            }
            Err(e) => {
                let context_error = AppError::StoreError(format!(
                    "Lookup of {} failed for '{}': {}",
                    entry.external_id, entry.title, e
                ));
                LogContext::error_with_context(&context_error, "Duplicate check failed");
                Classification::Rejected(FailedEntry {
                    reason: format!("Library lookup failed: {}", e),
                    entry,
                })
            }
        };

        timer.finish();
        classification
    }

    /// Record the caller should write to honor `policy`.
    ///
    /// `Skip` leaves the library as it is and yields nothing.
    pub fn resolution_candidate(
        existing: &LocalRecord,
        entry: &ImportEntry,
        policy: DuplicatePolicy,
    ) -> Option<LocalRecord> {
        match policy {
            DuplicatePolicy::Skip => None,
            DuplicatePolicy::Overwrite => {
                let mut candidate = existing.clone();
                candidate.title = entry.title.clone();
                candidate.current_progress = entry.current_progress;
                if entry.total_progress.is_some() {
                    candidate.total_progress = entry.total_progress;
                }
                candidate.status = StatusMapper::map(&entry.source_status);
                candidate.score = entry.score;
                Some(candidate)
            }
            DuplicatePolicy::KeepExisting => {
                let mut candidate = existing.clone();
                if candidate.total_progress.is_none() {
                    candidate.total_progress = entry.total_progress;
                }
                if candidate.score.is_none() {
                    candidate.score = entry.score;
                }
                Some(candidate)
            }
        }
    }

    /// Positions of entries whose (kind, identifier) already appeared earlier
    /// in the same document
    pub fn repeated_positions(entries: &[ImportEntry]) -> HashSet<usize> {
        let mut seen = HashSet::new();
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !seen.insert((entry.kind, entry.external_id.as_str())))
            .map(|(position, _)| position)
            .collect()
    }
}
