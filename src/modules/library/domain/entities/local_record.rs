use crate::modules::library::domain::value_objects::{LibraryStatus, MediaKind};
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The application's canonical representation of a tracked item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRecord {
    pub id: Uuid,
    /// Identifier on the external service the record was imported from
    pub external_id: String,
    pub title: String,
    pub kind: MediaKind,
    pub current_progress: u32,
    /// `None` when the total is not known yet
    pub total_progress: Option<u32>,
    pub status: LibraryStatus,
    pub score: Option<u8>,

    // Enrichment fields from the metadata service
    pub image_url: Option<String>,
    pub synopsis: Option<String>,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub source_medium: Option<String>,
    pub enriched: bool,

    pub imported_at: DateTime<Utc>,
}

impl LocalRecord {
    /// A record carrying tracking data only, without enrichment
    pub fn new(external_id: impl Into<String>, title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            title: title.into(),
            kind,
            current_progress: 0,
            total_progress: None,
            status: LibraryStatus::default(),
            score: None,
            image_url: None,
            synopsis: None,
            genres: Vec::new(),
            year: None,
            rank: None,
            popularity: None,
            source_medium: None,
            enriched: false,
            imported_at: Utc::now(),
        }
    }

    /// Check the record against the library's storage rules.
    ///
    /// Progress may not exceed a known total and scores live on a 1-10 scale.
    pub fn validate(&self) -> AppResult<()> {
        if self.external_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Record identifier cannot be empty".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Record {} has an empty title",
                self.external_id
            )));
        }
        if let Some(total) = self.total_progress {
            if self.current_progress > total {
                return Err(AppError::InvalidInput(format!(
                    "Progress {} exceeds total {} {} for '{}'",
                    self.current_progress,
                    total,
                    self.kind.progress_unit(),
                    self.title
                )));
            }
        }
        if let Some(score) = self.score {
            if !(1..=10).contains(&score) {
                return Err(AppError::InvalidInput(format!(
                    "Score must be between 1 and 10, got {}",
                    score
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_unenriched_plan_to_read() {
        let record = LocalRecord::new("1", "Cowboy Bebop", MediaKind::Anime);
        assert_eq!(record.status, LibraryStatus::PlanToRead);
        assert_eq!(record.current_progress, 0);
        assert!(!record.enriched);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn progress_beyond_known_total_is_rejected() {
        let mut record = LocalRecord::new("1", "Cowboy Bebop", MediaKind::Anime);
        record.total_progress = Some(26);
        record.current_progress = 30;
        assert!(matches!(record.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn progress_without_total_is_unbounded() {
        let mut record = LocalRecord::new("2", "One Piece", MediaKind::Manga);
        record.current_progress = 1100;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn score_outside_scale_is_rejected() {
        let mut record = LocalRecord::new("2", "Berserk", MediaKind::Manga);
        record.score = Some(11);
        assert!(record.validate().is_err());
    }
}
