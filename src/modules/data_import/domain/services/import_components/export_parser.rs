//! Parser for MyAnimeList-style XML list exports.
//!
//! A document holds any number of `<anime>` and `<manga>` elements, each with
//! one child element per field:
//!
//! ```xml
//! <myanimelist>
//!   <anime>
//!     <series_animedb_id>1</series_animedb_id>
//!     <series_title><![CDATA[Cowboy Bebop]]></series_title>
//!     <series_episodes>26</series_episodes>
//!     <my_watched_episodes>26</my_watched_episodes>
//!     <my_score>9</my_score>
//!     <my_status>Completed</my_status>
//!   </anime>
//! </myanimelist>
//! ```

use super::types::ImportEntry;
use crate::log_debug;
use crate::modules::library::MediaKind;
use crate::shared::errors::{AppError, AppResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

const STATUS_FIELD: &str = "my_status";
const SCORE_FIELD: &str = "my_score";

/// Element names carrying each field for one media kind
struct FieldNames {
    id: &'static str,
    title: &'static str,
    progress: &'static str,
    total: &'static str,
}

const ANIME_FIELDS: FieldNames = FieldNames {
    id: "series_animedb_id",
    title: "series_title",
    progress: "my_watched_episodes",
    total: "series_episodes",
};

const MANGA_FIELDS: FieldNames = FieldNames {
    id: "manga_mangadb_id",
    title: "manga_title",
    progress: "my_read_chapters",
    total: "manga_chapters",
};

impl FieldNames {
    fn for_kind(kind: MediaKind) -> &'static FieldNames {
        match kind {
            MediaKind::Anime => &ANIME_FIELDS,
            MediaKind::Manga => &MANGA_FIELDS,
        }
    }
}

fn record_kind(element: &str) -> Option<MediaKind> {
    match element {
        "anime" => Some(MediaKind::Anime),
        "manga" => Some(MediaKind::Manga),
        _ => None,
    }
}

/// Fields collected for the record element currently open
struct PendingRecord {
    kind: MediaKind,
    depth: usize,
    fields: HashMap<String, String>,
}

impl PendingRecord {
    fn new(kind: MediaKind, depth: usize) -> Self {
        Self {
            kind,
            depth,
            fields: HashMap::new(),
        }
    }

    fn append(&mut self, field: &str, text: &str) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push_str(text);
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn count(&self, field: &str) -> Option<u32> {
        self.text(field).and_then(|value| value.parse::<u32>().ok())
    }

    /// `None` when the identifier or title is missing
    fn into_entry(self) -> Option<ImportEntry> {
        let names = FieldNames::for_kind(self.kind);
        let external_id = self.text(names.id)?.to_string();
        let title = self.text(names.title).and_then(unwrap_cdata)?;

        Some(ImportEntry {
            external_id,
            title,
            kind: self.kind,
            current_progress: self.count(names.progress).unwrap_or(0),
            // Zero is not a meaningful total
            total_progress: self.count(names.total).filter(|total| *total > 0),
            source_status: self.text(STATUS_FIELD).unwrap_or_default().to_string(),
            score: self
                .count(SCORE_FIELD)
                .filter(|score| *score > 0)
                .and_then(|score| u8::try_from(score).ok()),
        })
    }
}

/// Strip a literal `<![CDATA[...]]>` wrapper left in escaped text and trim
fn unwrap_cdata(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .unwrap_or(trimmed)
        .trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

fn malformed(reader: &Reader<&[u8]>, message: impl std::fmt::Display) -> AppError {
    AppError::MalformedDocument(format!(
        "{} (at byte {})",
        message,
        reader.buffer_position()
    ))
}

pub struct ExportParser;

impl ExportParser {
    /// Extract every anime and manga entry from a decoded export.
    ///
    /// Elements without an identifier or title are dropped silently. Fails
    /// only when the text is not a well-formed element tree.
    pub fn parse(text: &str) -> AppResult<Vec<ImportEntry>> {
        let mut reader = Reader::from_str(text);
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut current: Option<PendingRecord> = None;
        let mut field: Option<String> = None;
        let mut entries = Vec::new();
        let mut dropped = 0usize;

        loop {
            match reader.read_event() {
                Err(e) => return Err(malformed(&reader, format!("Invalid markup: {}", e))),
                Ok(Event::Eof) => break,
                Ok(Event::Start(element)) => {
                    if depth == 0 && saw_root {
                        return Err(malformed(&reader, "Multiple root elements"));
                    }
                    depth += 1;
                    saw_root = true;
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();

                    match current.as_ref().map(|record| record.depth) {
                        None => {
                            if let Some(kind) = record_kind(&name) {
                                current = Some(PendingRecord::new(kind, depth));
                            }
                        }
                        Some(record_depth) if depth == record_depth + 1 => field = Some(name),
                        Some(_) => {}
                    }
                }
                Ok(Event::Empty(element)) => {
                    if depth == 0 {
                        if saw_root {
                            return Err(malformed(&reader, "Multiple root elements"));
                        }
                        saw_root = true;
                        continue;
                    }
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    match &mut current {
                        None if record_kind(&name).is_some() => dropped += 1,
                        Some(record) if depth == record.depth => record.append(&name, ""),
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => {
                    if depth == 0 {
                        return Err(malformed(&reader, "Closing tag without opening tag"));
                    }
                    match current.as_ref().map(|record| record.depth) {
                        Some(record_depth) if record_depth == depth => {
                            if let Some(record) = current.take() {
                                match record.into_entry() {
                                    Some(entry) => entries.push(entry),
                                    None => dropped += 1,
                                }
                            }
                            field = None;
                        }
                        Some(record_depth) if record_depth + 1 == depth => field = None,
                        _ => {}
                    }
                    depth -= 1;
                }
                Ok(Event::Text(text)) => {
                    if depth == 0 {
                        if !text.iter().all(u8::is_ascii_whitespace) {
                            return Err(malformed(&reader, "Text outside of the root element"));
                        }
                        continue;
                    }
                    if let (Some(record), Some(name)) = (current.as_mut(), field.as_deref()) {
                        if depth == record.depth + 1 {
                            let value = text
                                .unescape()
                                .map_err(|e| malformed(&reader, format!("Invalid text: {}", e)))?;
                            record.append(name, &value);
                        }
                    }
                }
                Ok(Event::CData(data)) => {
                    if let (Some(record), Some(name)) = (current.as_mut(), field.as_deref()) {
                        if depth == record.depth + 1 {
                            let value = std::str::from_utf8(&data)
                                .map_err(|e| malformed(&reader, format!("Invalid CDATA: {}", e)))?;
                            record.append(name, value);
                        }
                    }
                }
                // Declarations, comments, processing instructions, doctype
                Ok(_) => {}
            }
        }

        if depth != 0 {
            return Err(malformed(
                &reader,
                format!("Document ended with {} unclosed elements", depth),
            ));
        }
        if !saw_root {
            return Err(malformed(&reader, "Document has no root element"));
        }

        log_debug!(
            "Parsed {} export entries ({} incomplete elements dropped)",
            entries.len(),
            dropped
        );
        Ok(entries)
    }
}
