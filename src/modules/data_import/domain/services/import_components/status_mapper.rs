use crate::modules::library::LibraryStatus;

/// Maps status labels from list exports onto library statuses.
///
/// Exports spell statuses in words ("Watching", "Plan to Read") or, in older
/// files, as numeric codes. Unknown labels fall back to `PlanToRead` so an
/// entry is never lost over its status.
pub struct StatusMapper;

impl StatusMapper {
    pub fn map(source_status: &str) -> LibraryStatus {
        let normalized = source_status.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "watching" | "reading" | "rewatching" | "rereading" | "1" => LibraryStatus::Reading,
            "completed" | "2" => LibraryStatus::Completed,
            "on-hold" | "on hold" | "onhold" | "3" => LibraryStatus::OnHold,
            "dropped" | "4" => LibraryStatus::Dropped,
            "plan to watch" | "plan to read" | "6" => LibraryStatus::PlanToRead,
            _ => LibraryStatus::PlanToRead,
        }
    }
}
