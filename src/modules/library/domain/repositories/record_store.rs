use async_trait::async_trait;

use crate::modules::library::domain::entities::LocalRecord;
use crate::shared::errors::AppResult;

/// Port for the application's record store.
///
/// The sync core only reads through it; writing imported records back is the
/// caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find the record holding `external_id` inside the caller's library `scope`
    async fn find_by_identifier(
        &self,
        scope: &str,
        external_id: &str,
    ) -> AppResult<Option<LocalRecord>>;
}
