use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracking status of a record in the user's library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryStatus {
    /// Currently watching or reading
    Reading,
    Completed,
    OnHold,
    Dropped,
    /// Not started yet
    PlanToRead,
}

impl LibraryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryStatus::Reading => "reading",
            LibraryStatus::Completed => "completed",
            LibraryStatus::OnHold => "on_hold",
            LibraryStatus::Dropped => "dropped",
            LibraryStatus::PlanToRead => "plan_to_read",
        }
    }
}

impl Default for LibraryStatus {
    fn default() -> Self {
        LibraryStatus::PlanToRead
    }
}

impl fmt::Display for LibraryStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
