//! Turns an uploaded export file into UTF-8 text, transparently handling gzip.

use crate::log_debug;
use crate::shared::errors::{AppError, AppResult};
use flate2::read::GzDecoder;
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: char = '\u{feff}';

/// A bulk export as handed over by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDocument {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImportDocument {
    pub fn from_bytes(file_name: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.map(str::to_string),
            bytes,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            file_name: None,
            bytes: text.into().into_bytes(),
        }
    }

    /// Compressed when the content carries the gzip signature or the file name
    /// says so
    pub fn is_compressed(&self) -> bool {
        self.bytes.starts_with(&GZIP_MAGIC)
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".gz"))
    }
}

pub struct DocumentDecoder;

impl DocumentDecoder {
    /// Decompress if needed and decode as UTF-8.
    ///
    /// Any failure here is fatal for the whole import: no entry can be
    /// recovered from undecodable bytes.
    pub fn decode(document: &ImportDocument) -> AppResult<String> {
        let raw = if document.is_compressed() {
            Self::gunzip(&document.bytes)?
        } else {
            document.bytes.clone()
        };

        let text = String::from_utf8(raw).map_err(|e| {
            AppError::MalformedDocument(format!("Document is not valid UTF-8: {}", e))
        })?;

        Ok(match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    fn gunzip(bytes: &[u8]) -> AppResult<Vec<u8>> {
        let mut decoder = GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).map_err(|e| {
            AppError::MalformedDocument(format!("Failed to decompress document: {}", e))
        })?;

        log_debug!(
            "Decompressed export: {} bytes -> {} bytes",
            bytes.len(),
            decompressed.len()
        );
        Ok(decompressed)
    }
}
