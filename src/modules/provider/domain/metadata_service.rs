use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::modules::library::MediaKind;
use crate::shared::errors::AppResult;

/// Descriptive fields returned by a metadata lookup.
///
/// Every field is optional; services fill what they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub image_url: Option<String>,
    /// Total episodes (anime) or chapters (manga)
    pub total_progress: Option<u32>,
    pub synopsis: Option<String>,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    /// Original medium, e.g. "Manga" or "Light novel"
    pub source_medium: Option<String>,
}

/// Port for the external metadata service.
///
/// Implementations must route their remote calls through the shared
/// throttled request queue of their endpoint family.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Look up descriptive fields for `external_id` of the given kind
    async fn fetch_by_identifier(&self, external_id: &str, kind: MediaKind)
        -> AppResult<MediaMetadata>;
}
