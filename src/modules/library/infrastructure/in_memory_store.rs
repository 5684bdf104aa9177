use async_trait::async_trait;
use dashmap::DashMap;

use crate::log_debug;
use crate::modules::library::domain::{LocalRecord, RecordStore};
use crate::shared::errors::AppResult;

/// Record store held in process memory, keyed by library scope and external id.
///
/// Useful for previews and tests; production callers plug in their own
/// persistent store through [`RecordStore`].
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: DashMap<(String, String), LocalRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a record, replacing any record with the same identifier
    pub fn insert(&self, scope: &str, record: LocalRecord) -> AppResult<Option<LocalRecord>> {
        record.validate()?;
        log_debug!(
            "Storing {} record {} in library '{}'",
            record.kind,
            record.external_id,
            scope
        );
        Ok(self
            .records
            .insert((scope.to_string(), record.external_id.clone()), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_identifier(
        &self,
        scope: &str,
        external_id: &str,
    ) -> AppResult<Option<LocalRecord>> {
        Ok(self
            .records
            .get(&(scope.to_string(), external_id.to_string()))
            .map(|entry| entry.value().clone()))
    }
}
