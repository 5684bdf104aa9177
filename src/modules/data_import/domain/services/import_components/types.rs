use crate::modules::library::{LocalRecord, MediaKind};
use serde::{Deserialize, Serialize};

/// One record parsed out of a bulk export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub external_id: String,
    pub title: String,
    pub kind: MediaKind,
    pub current_progress: u32,
    /// `None` when the export has no total or reports zero
    pub total_progress: Option<u32>,
    /// Status label exactly as the export spelled it
    pub source_status: String,
    /// `None` when unscored
    pub score: Option<u8>,
}

/// How the caller wants collisions with existing records resolved.
///
/// The pipeline never writes; the policy shapes the advisory candidate
/// attached to each duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the existing tracking data with the imported one
    Overwrite,
    /// Leave the existing record untouched
    #[default]
    Skip,
    /// Keep the existing record, filling only what it lacks
    KeepExisting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub existing: LocalRecord,
    pub entry: ImportEntry,
    pub policy: DuplicatePolicy,
    /// Record the caller should write to apply `policy`, if any
    pub candidate: Option<LocalRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub entry: ImportEntry,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub entry: ImportEntry,
    pub reason: String,
}

/// What happened to one entry; every entry gets exactly one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported { record: LocalRecord },
    Duplicate(DuplicateEntry),
    Error(FailedEntry),
    Skipped(SkippedEntry),
}

impl ImportOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ImportOutcome::Imported { .. } => "imported",
            ImportOutcome::Duplicate(_) => "duplicate",
            ImportOutcome::Error(_) => "error",
            ImportOutcome::Skipped(_) => "skipped",
        }
    }

    /// Title the outcome is reported under
    pub fn title(&self) -> &str {
        match self {
            ImportOutcome::Imported { record } => &record.title,
            ImportOutcome::Duplicate(duplicate) => &duplicate.entry.title,
            ImportOutcome::Error(failed) => &failed.entry.title,
            ImportOutcome::Skipped(skipped) => &skipped.entry.title,
        }
    }
}

/// Batch-level summary handed back to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub imported: Vec<LocalRecord>,
    pub duplicates: Vec<DuplicateEntry>,
    pub errors: Vec<FailedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl ImportResult {
    pub fn push(&mut self, outcome: ImportOutcome) {
        self.total += 1;
        match outcome {
            ImportOutcome::Imported { record } => self.imported.push(record),
            ImportOutcome::Duplicate(duplicate) => self.duplicates.push(duplicate),
            ImportOutcome::Error(failed) => self.errors.push(failed),
            ImportOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Imported records that received metadata enrichment
    pub fn enriched_count(&self) -> usize {
        self.imported.iter().filter(|r| r.enriched).count()
    }

    /// Category counts add up to the entry total
    pub fn is_consistent(&self) -> bool {
        self.total
            == self.imported.len() + self.duplicates.len() + self.errors.len() + self.skipped.len()
    }
}

impl FromIterator<ImportOutcome> for ImportResult {
    fn from_iter<I: IntoIterator<Item = ImportOutcome>>(outcomes: I) -> Self {
        let mut result = ImportResult::default();
        for outcome in outcomes {
            result.push(outcome);
        }
        result
    }
}

/// Progress snapshot reported after each entry completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub current: usize,
    pub total: usize,
    /// Human-readable status line for the UI
    pub message: String,
    pub imported_count: usize,
    pub duplicate_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

/// Caller-chosen knobs for one import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Library the duplicate lookup is scoped to
    pub scope: String,
    pub duplicate_policy: DuplicatePolicy,
    /// Enrichment calls allowed in the queue at once; results keep input order
    pub enrichment_concurrency: usize,
    /// Kinds to import; `None` imports everything
    pub kinds: Option<Vec<MediaKind>>,
}

impl ImportOptions {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            duplicate_policy: DuplicatePolicy::default(),
            enrichment_concurrency: 1,
            kinds: None,
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.enrichment_concurrency = concurrency.max(1);
        self
    }

    pub fn only_kinds(mut self, kinds: Vec<MediaKind>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    pub fn accepts(&self, kind: MediaKind) -> bool {
        self.kinds
            .as_ref()
            .map_or(true, |kinds| kinds.contains(&kind))
    }
}
