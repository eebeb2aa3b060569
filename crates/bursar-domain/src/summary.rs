//! Batch summary statistics derived from a set of analysis records

use crate::invoice::{InvoiceAnalysis, ReimbursementStatus};
use serde::{Deserialize, Serialize};

/// Aggregate statistics over one analyzed batch
///
/// A pure function of its input records, recomputed on demand and never
/// persisted independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of records in the batch
    pub total_invoices: usize,

    /// Records with status approved
    pub approved: usize,

    /// Records with status declined
    pub declined: usize,

    /// Records with status partial_approved
    pub partial_approved: usize,

    /// Sum of invoice amounts, rounded to 2 decimals
    pub total_amount: f64,

    /// Sum of reimbursable amounts, rounded to 2 decimals
    pub total_reimbursable: f64,

    /// Percentage of records approved, rounded to 1 decimal
    pub compliance_rate: f64,
}

impl BatchSummary {
    /// Compute the summary for a record slice
    ///
    /// An empty slice yields the all-zero summary (compliance_rate 0.0, not
    /// NaN).
    pub fn from_records(records: &[InvoiceAnalysis]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total_invoices = records.len();
        let approved = count_status(records, ReimbursementStatus::Approved);
        let declined = count_status(records, ReimbursementStatus::Declined);
        let partial_approved = count_status(records, ReimbursementStatus::PartialApproved);

        let total_amount: f64 = records.iter().map(|r| r.amount).sum();
        let total_reimbursable: f64 = records.iter().map(|r| r.reimbursable_amount).sum();

        let compliance_rate = approved as f64 / total_invoices as f64 * 100.0;

        Self {
            total_invoices,
            approved,
            declined,
            partial_approved,
            total_amount: round2(total_amount),
            total_reimbursable: round2(total_reimbursable),
            compliance_rate: round1(compliance_rate),
        }
    }
}

fn count_status(records: &[InvoiceAnalysis], status: ReimbursementStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
