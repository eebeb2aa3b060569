//! ZIP archive processing for uploaded invoice batches

use crate::error::ExtractError;
use crate::extractor::TextExtractor;
use std::io::{Cursor, Read};
use tracing::{error, info};
use zip::ZipArchive;

/// One document pulled out of an uploaded archive
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// Entry name inside the archive
    pub filename: String,

    /// Extracted text, an inline error description, or the no-text sentinel
    pub text: String,
}

impl TextExtractor {
    /// Extract every eligible document from a ZIP archive
    ///
    /// Eligible entries are names ending in `.pdf` (case-insensitive) that
    /// are not macOS metadata (`__MACOSX/...`). Each entry is extracted
    /// independently; a per-entry read failure becomes that entry's text so
    /// the rest of the batch proceeds. Entry order is preserved.
    ///
    /// # Errors
    ///
    /// `ExtractError::Archive` when the ZIP cannot be opened,
    /// `ExtractError::NoDocuments` when no eligible entries exist.
    pub fn extract_archive(&self, bytes: &[u8]) -> Result<Vec<ExtractedDocument>, ExtractError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractError::Archive(e.to_string()))?;

        let mut documents = Vec::new();

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Failed to open archive entry {}: {}", index, e);
                    continue;
                }
            };

            let filename = entry.name().to_string();
            if !is_eligible(&filename) {
                continue;
            }

            let mut contents = Vec::new();
            let text = match entry.read_to_end(&mut contents) {
                Ok(_) => self.extract(&contents, &filename),
                Err(e) => {
                    error!("Failed to read {}: {}", filename, e);
                    format!("Error processing {}: {}", filename, e)
                }
            };

            info!("Processed archive entry: {}", filename);
            documents.push(ExtractedDocument { filename, text });
        }

        if documents.is_empty() {
            return Err(ExtractError::NoDocuments);
        }

        Ok(documents)
    }
}

/// An entry counts as an invoice document if it is a PDF and not an OS
/// housekeeping artifact.
fn is_eligible(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf") && !name.starts_with("__MACOSX")
}
