use crate::modules::library::MediaKind;
use crate::modules::provider::domain::{MediaMetadata, MetadataService};
use crate::modules::provider::infrastructure::http_client::{QueuedRequest, ThrottledQueue};
use crate::shared::config::JikanConfig;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    dto::{JikanAnimeResponse, JikanMangaResponse},
    mapper::JikanMapper,
};

/// Metadata lookups against the Jikan (MyAnimeList) REST API.
///
/// All calls go through the shared queue, which owns throttling and retries.
pub struct JikanMetadataService {
    queue: ThrottledQueue,
    base_url: String,
    config: JikanConfig,
}

impl JikanMetadataService {
    pub fn new(queue: ThrottledQueue, config: JikanConfig) -> Self {
        Self {
            queue,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    fn lookup_url(&self, external_id: &str, kind: MediaKind) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            kind.as_str(),
            urlencoding::encode(external_id)
        )
    }
}

#[async_trait]
impl MetadataService for JikanMetadataService {
    async fn fetch_by_identifier(
        &self,
        external_id: &str,
        kind: MediaKind,
    ) -> AppResult<MediaMetadata> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(AppError::InvalidInput(
                "Metadata lookup requires an identifier".to_string(),
            ));
        }

        let url = self.lookup_url(external_id, kind);
        debug!("Jikan lookup for {} {}", kind, external_id);

        let request = QueuedRequest::get(url).with_timeout(self.config.request_timeout);
        let response = self.queue.fetch(request).await?;

        if response.status == 404 {
            return Err(AppError::NotFound(format!(
                "Jikan has no {} with ID {}",
                kind, external_id
            )));
        }
        if !response.is_success() {
            return Err(AppError::ApiError(format!(
                "Jikan API returned error: {}",
                response.status
            )));
        }

        let metadata = match kind {
            MediaKind::Anime => {
                JikanMapper::anime_to_metadata(response.json::<JikanAnimeResponse>()?.data)
            }
            MediaKind::Manga => {
                JikanMapper::manga_to_metadata(response.json::<JikanMangaResponse>()?.data)
            }
        };

        info!(
            "Jikan metadata fetched for {} {} ({})",
            kind,
            external_id,
            metadata.title.as_deref().unwrap_or("untitled")
        );
        Ok(metadata)
    }
}
