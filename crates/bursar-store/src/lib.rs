//! Bursar Retrieval Index
//!
//! Append-only in-memory store of analyzed invoices, searchable by a
//! recency-biased keyword filter. Each stored record is denormalized into a
//! formatted text block at store time; search returns those blocks verbatim
//! as chat context.
//!
//! This is deliberately not a ranked semantic index: the matcher is
//! ANY-token substring containment over the 20 most recent documents, and
//! nothing survives a process restart. Swapping in an embedding-backed
//! engine would change the capability boundary, not the callers.
//!
//! # Thread Safety
//!
//! A single mutex guards the append-only document list. Construct one index
//! at process start and share it by `Arc`; tests build a fresh instance
//! each.

#![warn(missing_docs)]

use bursar_domain::InvoiceAnalysis;
use std::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

/// Only this many of the most recent documents are searchable
pub const RECENT_WINDOW: usize = 20;

/// Searchable projection of one analyzed invoice
///
/// Created at store time, never mutated. Insertion order is recency order.
#[derive(Debug, Clone)]
struct IndexedDocument {
    /// Store-assigned document id
    id: String,

    /// Formatted block handed back as chat context
    display: String,

    /// Lowercased haystack the keyword filter runs against
    searchable: String,
}

/// Append-only invoice index with lexical search
#[derive(Default)]
pub struct InvoiceIndex {
    documents: Mutex<Vec<IndexedDocument>>,
}

impl InvoiceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one analyzed invoice together with its extracted source text
    ///
    /// Never fails observably: an inconsistent lock is logged and the append
    /// dropped, so a store problem cannot block the caller's batch.
    pub fn add(&self, record: &InvoiceAnalysis, source_text: &str) {
        let display = render_display(record);
        let searchable = format!(
            "{} {} {} {}",
            record.reasoning,
            record.employee_name,
            record.status.as_str(),
            source_text
        )
        .to_lowercase();

        let document = IndexedDocument {
            id: Uuid::new_v4().to_string(),
            display,
            searchable,
        };

        match self.documents.lock() {
            Ok(mut documents) => {
                info!("Indexed analysis: {}", record.invoice_id);
                documents.push(document);
            }
            Err(e) => {
                error!("Failed to index {}: {}", record.invoice_id, e);
            }
        }
    }

    /// Keyword search over the most recent documents
    ///
    /// Tokenizes the query on whitespace and includes a document when ANY
    /// token appears as a substring of its searchable text,
    /// case-insensitive. Scans at most [`RECENT_WINDOW`] documents, newest
    /// first, and stops once `max_results` matches are collected.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<String> {
        let needle = query.to_lowercase();
        let tokens: Vec<&str> = needle.split_whitespace().collect();
        if tokens.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let documents = match self.documents.lock() {
            Ok(documents) => documents,
            Err(e) => {
                error!("Search failed: {}", e);
                return Vec::new();
            }
        };

        let mut matches = Vec::new();
        for document in documents.iter().rev().take(RECENT_WINDOW) {
            if tokens.iter().any(|token| document.searchable.contains(token)) {
                matches.push(document.display.clone());
                if matches.len() >= max_results {
                    break;
                }
            }
        }

        info!("Found {} documents for query", matches.len());
        matches
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.lock().map(|documents| documents.len()).unwrap_or(0)
    }

    /// Whether the index holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render the formatted context block for one record
fn render_display(record: &InvoiceAnalysis) -> String {
    let items: Vec<&str> = record
        .line_items
        .iter()
        .map(|item| item.description.as_str())
        .collect();

    format!(
        "Invoice: {}\n\
         Employee: {}\n\
         Vendor: {}\n\
         Amount: ₹{}\n\
         Category: {}\n\
         Status: {}\n\
         Reimbursable: ₹{}\n\
         Alcohol: {}\n\
         Items: {}\n\
         Reasoning: {}",
        record.invoice_id,
        record.employee_name,
        record.vendor_name,
        record.amount,
        record.category.as_str(),
        record.status.as_str(),
        record.reimbursable_amount,
        record.contains_alcohol,
        items.join(", "),
        record.reasoning
    )
}
