use crate::shared::utils::logger::LogContext;
use std::sync::Arc;

use super::types::{ImportProgress, ImportResult};

/// Callback invoked with each progress snapshot
pub type ProgressCallback = Arc<dyn Fn(ImportProgress) + Send + Sync>;

/// Reports import progress to an optional caller-supplied callback
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self { callback }
    }

    pub fn is_enabled(&self) -> bool {
        self.callback.is_some()
    }

    /// Snapshot after an entry has been settled
    pub fn entry_completed(&self, result: &ImportResult, expected: usize, title: &str) {
        LogContext::entry_settled(result.total, expected, title);
        self.emit(ImportProgress {
            current: result.total,
            total: expected,
            message: format!("Processed '{}'", title),
            imported_count: result.imported.len(),
            duplicate_count: result.duplicates.len(),
            error_count: result.errors.len(),
            skipped_count: result.skipped.len(),
        });
    }

    pub fn emit(&self, progress: ImportProgress) -> bool {
        match &self.callback {
            Some(callback) => {
                callback(progress);
                true
            }
            None => false,
        }
    }
}
