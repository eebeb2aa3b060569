//! Strategy-chained text extraction

use crate::strategy::{ExtractionStrategy, LayoutStrategy, ObjectStreamStrategy};
use tracing::{debug, warn};

/// Minimum trimmed length for an extraction result to be considered usable
const MIN_USABLE_LEN: usize = 20;

/// Sentinel returned when no strategy produced any text
const NO_TEXT_SENTINEL: &str = "No readable text found";

/// Chained PDF text extractor
///
/// Tries each strategy in order and keeps the first result whose trimmed
/// length clears [`MIN_USABLE_LEN`]. When none clears it, the last
/// strategy's partial output is returned, or a sentinel string if every
/// strategy came back empty. Extraction never fails for a single document.
pub struct TextExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    /// Default chain: layout-aware first, object-stream fallback
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(LayoutStrategy), Box::new(ObjectStreamStrategy)],
        }
    }

    /// Build an extractor with a custom strategy chain
    ///
    /// Used by tests to exercise the chain without real PDF bytes.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract text from one document
    pub fn extract(&self, bytes: &[u8], filename: &str) -> String {
        let mut last_output = String::new();

        for strategy in &self.strategies {
            let text = strategy.extract(bytes);
            if text.trim().len() > MIN_USABLE_LEN {
                debug!(
                    "Extracted {} chars from '{}' with {} strategy",
                    text.len(),
                    filename,
                    strategy.name()
                );
                return text;
            }
            last_output = text;
        }

        if last_output.is_empty() {
            warn!("No strategy produced text for '{}'", filename);
            NO_TEXT_SENTINEL.to_string()
        } else {
            warn!(
                "Only partial text ({} chars) extracted from '{}'",
                last_output.len(),
                filename
            );
            last_output
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
