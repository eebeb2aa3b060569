//! PDF text extraction strategies
//!
//! Each strategy is a total function from bytes to text: any internal
//! failure is reported as an empty string, and the chain in
//! [`crate::TextExtractor`] decides what to do with it.

use std::panic::{self, AssertUnwindSafe};

/// A single way of pulling text out of a PDF
///
/// Implementations return an empty string on any failure.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Extract text from raw document bytes
    fn extract(&self, bytes: &[u8]) -> String;
}

/// Layout-aware extraction via `pdf-extract`
///
/// Best output quality on well-formed invoices; first in the default chain.
pub struct LayoutStrategy;

impl ExtractionStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extract(&self, bytes: &[u8]) -> String {
        // pdf-extract panics on some malformed files, so the unwind has to
        // be contained here to keep the strategy total.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match result {
            Ok(Ok(text)) => text,
            Ok(Err(_)) | Err(_) => String::new(),
        }
    }
}

/// Object-stream extraction via `lopdf`
///
/// Reads page content streams directly; picks up text in files whose layout
/// pass produced little or nothing.
pub struct ObjectStreamStrategy;

impl ExtractionStrategy for ObjectStreamStrategy {
    fn name(&self) -> &'static str {
        "object-stream"
    }

    fn extract(&self, bytes: &[u8]) -> String {
        let document = match lopdf::Document::load_mem(bytes) {
            Ok(document) => document,
            Err(_) => return String::new(),
        };

        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return String::new();
        }

        document.extract_text(&pages).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_strategy_empty_on_garbage() {
        let strategy = LayoutStrategy;
        assert_eq!(strategy.extract(b"not a pdf at all"), "");
    }

    #[test]
    fn test_object_stream_strategy_empty_on_garbage() {
        let strategy = ObjectStreamStrategy;
        assert_eq!(strategy.extract(b"not a pdf at all"), "");
        assert_eq!(strategy.extract(b""), "");
    }
}
