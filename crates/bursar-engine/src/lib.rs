//! Bursar Analysis Engine
//!
//! Orchestrates invoice batch analysis and the retrieval-backed chat loop.
//!
//! # Architecture
//!
//! ```text
//! ZIP upload → TextExtractor → Analyst → normalize → InvoiceIndex
//!                                 │                       │
//! chat query ─────────────────────┴── ChatEngine ─────────┘
//! ```
//!
//! The engine's contract is totality at the document level: every eligible
//! archive entry produces a structurally complete analysis record, whatever
//! the model did. Failure handling is explicit - the analyst's internal
//! request returns a `Result`, and its error branch is where the
//! deterministic pending-review fallback gets built.
//!
//! # Example
//!
//! ```no_run
//! use bursar_domain::PolicyRules;
//! use bursar_engine::{Analyst, AnalysisPipeline, ChatEngine};
//! use bursar_llm::GeminiProvider;
//! use bursar_store::InvoiceIndex;
//! use std::sync::Arc;
//!
//! # async fn example(archive: &[u8]) {
//! let provider = GeminiProvider::new("api-key", "gemini-1.5-flash");
//! let analyst = Arc::new(Analyst::new(provider, PolicyRules::default()));
//! let index = Arc::new(InvoiceIndex::new());
//!
//! let pipeline = AnalysisPipeline::new(Arc::clone(&analyst), Arc::clone(&index));
//! let result = pipeline.process_batch("policy text", archive, "Priya Sharma").await;
//! println!("{}", result.message);
//!
//! let chat = ChatEngine::new(analyst, index);
//! let reply = chat.respond("which invoices were declined?", None).await;
//! println!("{}", reply.response);
//! # }
//! ```

#![warn(missing_docs)]

mod analyst;
mod batch;
mod error;
mod normalize;
mod parser;
mod prompt;
mod session;

pub use analyst::Analyst;
pub use batch::AnalysisPipeline;
pub use error::AnalystError;
pub use normalize::{fallback_fields, normalize_record};
pub use prompt::CHAT_CONTEXT_LIMIT;
pub use session::ChatEngine;
