//! Error types for document extraction

use thiserror::Error;

/// Errors that can occur while processing an invoice archive
///
/// Per-document extraction failures are absorbed into the document's text;
/// only archive-level problems surface here, and they fail the whole batch.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive could not be opened or read
    #[error("Failed to process ZIP file: {0}")]
    Archive(String),

    /// The archive contained no eligible PDF entries
    #[error("No valid PDF documents found in archive")]
    NoDocuments,
}
