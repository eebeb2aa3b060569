//! Batch orchestration: extract, analyze, index, summarize

use crate::analyst::Analyst;
use bursar_domain::traits::LlmProvider;
use bursar_domain::{AnalysisResponse, BatchSummary};
use bursar_extract::TextExtractor;
use bursar_store::InvoiceIndex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs one uploaded archive through the full analysis pipeline
///
/// Only archive extraction can fail the batch. Every extracted document
/// yields a record: per-document problems surface as pending-review records
/// from the analyst, and index appends never fail observably, so one bad
/// invoice cannot block the rest.
pub struct AnalysisPipeline<L> {
    analyst: Arc<Analyst<L>>,
    extractor: TextExtractor,
    index: Arc<InvoiceIndex>,
}

impl<L> AnalysisPipeline<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a pipeline with the default extraction chain
    pub fn new(analyst: Arc<Analyst<L>>, index: Arc<InvoiceIndex>) -> Self {
        Self {
            analyst,
            extractor: TextExtractor::new(),
            index,
        }
    }

    /// Replace the extraction chain (tests inject fixed-output strategies)
    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Analyze every eligible document in the uploaded archive
    pub async fn process_batch(
        &self,
        policy_text: &str,
        archive_bytes: &[u8],
        employee_name: &str,
    ) -> AnalysisResponse {
        let start = Instant::now();
        info!("Starting analysis for {}", employee_name);
        debug!(
            "Policy document received: {} chars",
            policy_text.chars().count()
        );

        let documents = match self.extractor.extract_archive(archive_bytes) {
            Ok(documents) => documents,
            Err(e) => {
                error!("Batch analysis failed: {}", e);
                return AnalysisResponse::failure(format!("Analysis failed: {}", e));
            }
        };

        let mut records = Vec::with_capacity(documents.len());
        for document in &documents {
            let record = self
                .analyst
                .analyze_document(&document.text, &document.filename, employee_name)
                .await;

            self.index.add(&record, &document.text);
            records.push(record);
        }

        let summary = BatchSummary::from_records(&records);
        let processing_time = round2(start.elapsed().as_secs_f64());

        info!("Analysis completed in {:.2}s", processing_time);

        AnalysisResponse {
            message: format!("Successfully analyzed {} invoices", records.len()),
            summary,
            processing_time,
            success: true,
            analysis_results: records,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
