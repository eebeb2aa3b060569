//! Batch analysis response returned to callers

use crate::invoice::InvoiceAnalysis;
use crate::summary::BatchSummary;
use serde::{Deserialize, Serialize};

/// Result of analyzing one uploaded invoice batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// One record per extracted document, in archive order
    pub analysis_results: Vec<InvoiceAnalysis>,

    /// Aggregate statistics over `analysis_results`
    pub summary: BatchSummary,

    /// Wall-clock processing time in seconds, 2-decimal rounded
    pub processing_time: f64,

    /// False only for batch-fatal failures (unreadable or empty archive)
    pub success: bool,

    /// Human-readable outcome description
    pub message: String,
}

impl AnalysisResponse {
    /// Batch-fatal failure response: no records, zeroed summary
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            analysis_results: vec![],
            summary: BatchSummary::default(),
            processing_time: 0.0,
            success: false,
            message: message.into(),
        }
    }
}
