//! Bursar Document Extraction
//!
//! Turns uploaded invoice documents into plain text for analysis.
//!
//! # Overview
//!
//! Extraction is a chain of strategies tried in order, with a minimum-usable
//! length gate between them: a layout-aware pass first, then an
//! object-stream pass for files the first strategy reads poorly. Per-file
//! extraction is total - a document that defeats every strategy yields a
//! sentinel string, never an error, so one unreadable invoice cannot block a
//! batch.
//!
//! Archive processing enumerates a ZIP upload, filters to eligible PDF
//! entries, and extracts each independently. Only two conditions are fatal:
//! an archive that cannot be opened, and an archive containing no eligible
//! entries.

#![warn(missing_docs)]

mod archive;
mod error;
mod extractor;
mod strategy;

pub use archive::ExtractedDocument;
pub use error::ExtractError;
pub use extractor::TextExtractor;
pub use strategy::{ExtractionStrategy, LayoutStrategy, ObjectStreamStrategy};
