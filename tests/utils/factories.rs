/// Test data factories using builder pattern
///
/// Provides convenient methods to create export documents, API bodies and
/// library records with sensible defaults
use flate2::write::GzEncoder;
use flate2::Compression;
use media_sync::modules::library::{LibraryStatus, LocalRecord, MediaKind};
use media_sync::shared::config::{JikanConfig, SyncConfig};
use std::io::Write;

pub const JIKAN_BASE: &str = "https://jikan.test/v4";

pub fn anime_url(id: &str) -> String {
    format!("{}/anime/{}", JIKAN_BASE, id)
}

pub fn manga_url(id: &str) -> String {
    format!("{}/manga/{}", JIKAN_BASE, id)
}

/// Default configuration pointed at the fake Jikan host
pub fn test_config() -> SyncConfig {
    SyncConfig {
        jikan: JikanConfig {
            base_url: JIKAN_BASE.to_string(),
            ..JikanConfig::default()
        },
        ..SyncConfig::default()
    }
}

pub struct ExportEntry {
    kind: MediaKind,
    id: String,
    title: String,
    progress: Option<String>,
    total: Option<String>,
    status: String,
    score: Option<String>,
    cdata_title: bool,
}

impl ExportEntry {
    pub fn anime(id: &str, title: &str) -> Self {
        Self::new(MediaKind::Anime, id, title)
    }

    pub fn manga(id: &str, title: &str) -> Self {
        Self::new(MediaKind::Manga, id, title)
    }

    fn new(kind: MediaKind, id: &str, title: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
            title: title.to_string(),
            progress: None,
            total: None,
            status: "Plan to Watch".to_string(),
            score: None,
            cdata_title: false,
        }
    }

    pub fn progress(mut self, progress: u32) -> Self {
        self.progress = Some(progress.to_string());
        self
    }

    pub fn total(mut self, total: u32) -> Self {
        self.total = Some(total.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn score(mut self, score: u8) -> Self {
        self.score = Some(score.to_string());
        self
    }

    pub fn cdata_title(mut self) -> Self {
        self.cdata_title = true;
        self
    }

    fn to_xml(&self) -> String {
        let (tag, id_tag, title_tag, progress_tag, total_tag) = match self.kind {
            MediaKind::Anime => (
                "anime",
                "series_animedb_id",
                "series_title",
                "my_watched_episodes",
                "series_episodes",
            ),
            MediaKind::Manga => (
                "manga",
                "manga_mangadb_id",
                "manga_title",
                "my_read_chapters",
                "manga_chapters",
            ),
        };
        let title = if self.cdata_title {
            format!("<![CDATA[ {} ]]>", self.title)
        } else {
            self.title.clone()
        };

        let mut xml = format!(
            "  <{tag}>\n    <{id_tag}>{}</{id_tag}>\n    <{title_tag}>{}</{title_tag}>\n",
            self.id, title
        );
        if let Some(progress) = &self.progress {
            xml.push_str(&format!("    <{progress_tag}>{}</{progress_tag}>\n", progress));
        }
        if let Some(total) = &self.total {
            xml.push_str(&format!("    <{total_tag}>{}</{total_tag}>\n", total));
        }
        if let Some(score) = &self.score {
            xml.push_str(&format!("    <my_score>{}</my_score>\n", score));
        }
        xml.push_str(&format!("    <my_status>{}</my_status>\n  </{tag}>\n", self.status));
        xml
    }
}

#[derive(Default)]
pub struct ExportBuilder {
    entries: Vec<ExportEntry>,
}

impl ExportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, entry: ExportEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn build(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<myanimelist>\n  <myinfo>\n    <user_name>tester</user_name>\n  </myinfo>\n",
        );
        for entry in &self.entries {
            xml.push_str(&entry.to_xml());
        }
        xml.push_str("</myanimelist>\n");
        xml
    }

    pub fn build_gzip(&self) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(self.build().as_bytes()).unwrap();
        encoder.finish().unwrap()
    }
}

/// Jikan `/anime/{id}` response body
pub fn jikan_anime_body(id: u32, title: &str, episodes: Option<u32>) -> String {
    serde_json::json!({
        "data": {
            "mal_id": id,
            "title": title,
            "images": { "jpg": { "image_url": format!("https://cdn.jikan.test/{}.jpg", id) } },
            "episodes": episodes,
            "source": "Manga",
            "synopsis": format!("Synopsis of {}", title),
            "year": 2002,
            "rank": 600,
            "popularity": 10,
            "genres": [{ "mal_id": 1, "type": "anime", "name": "Action" }]
        }
    })
    .to_string()
}

/// Jikan `/manga/{id}` response body
pub fn jikan_manga_body(id: u32, title: &str, chapters: Option<u32>) -> String {
    serde_json::json!({
        "data": {
            "mal_id": id,
            "title": title,
            "type": "Manga",
            "chapters": chapters,
            "published": { "prop": { "from": { "year": 1989 } } }
        }
    })
    .to_string()
}

pub fn library_record(id: &str, title: &str, kind: MediaKind, progress: u32) -> LocalRecord {
    let mut record = LocalRecord::new(id, title, kind);
    record.current_progress = progress;
    record.status = LibraryStatus::Reading;
    record
}
