use serde::{Deserialize, Serialize};
use std::fmt;

/// Media classification shared by export entries and local records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Anime,
    Manga,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
        }
    }

    /// Unit the progress counters are measured in
    pub fn progress_unit(&self) -> &'static str {
        match self {
            MediaKind::Anime => "episodes",
            MediaKind::Manga => "chapters",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
