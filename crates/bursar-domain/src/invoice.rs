//! Invoice analysis records - the unit of work the pipeline produces

use serde::{Deserialize, Serialize};

/// Expense category an invoice is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Meals and beverages
    Food,
    /// Inter-city travel
    Travel,
    /// Hotel / lodging
    Accommodation,
    /// Daily local transport (office cabs)
    Transport,
}

impl ExpenseCategory {
    /// Wire representation used in model output and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Travel => "travel",
            ExpenseCategory::Accommodation => "accommodation",
            ExpenseCategory::Transport => "transport",
        }
    }

    /// Parse a wire string, returning `None` for anything unrecognized
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "food" => Some(ExpenseCategory::Food),
            "travel" => Some(ExpenseCategory::Travel),
            "accommodation" => Some(ExpenseCategory::Accommodation),
            "transport" => Some(ExpenseCategory::Transport),
            _ => None,
        }
    }
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        ExpenseCategory::Food
    }
}

/// Reimbursement decision for an analyzed invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementStatus {
    /// Fully reimbursable
    Approved,
    /// Not reimbursable (policy violation)
    Declined,
    /// Reimbursable up to the category cap
    PartialApproved,
    /// Could not be classified; needs a human
    PendingReview,
}

impl ReimbursementStatus {
    /// Wire representation used in model output and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ReimbursementStatus::Approved => "approved",
            ReimbursementStatus::Declined => "declined",
            ReimbursementStatus::PartialApproved => "partial_approved",
            ReimbursementStatus::PendingReview => "pending_review",
        }
    }

    /// Parse a wire string, returning `None` for anything unrecognized
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(ReimbursementStatus::Approved),
            "declined" => Some(ReimbursementStatus::Declined),
            "partial_approved" => Some(ReimbursementStatus::PartialApproved),
            "pending_review" => Some(ReimbursementStatus::PendingReview),
            _ => None,
        }
    }
}

impl Default for ReimbursementStatus {
    fn default() -> Self {
        ReimbursementStatus::PendingReview
    }
}

/// A single line item on an invoice
///
/// Immutable once attached to an analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Item description as it appears on the invoice
    #[serde(default = "default_item_description")]
    pub description: String,

    /// Quantity purchased
    #[serde(default = "default_item_quantity")]
    pub quantity: u32,

    /// Price per unit in source currency
    #[serde(default)]
    pub unit_price: f64,

    /// Line total in source currency
    #[serde(default)]
    pub amount: f64,
}

fn default_item_description() -> String {
    "Unknown Item".to_string()
}

fn default_item_quantity() -> u32 {
    1
}

impl Default for InvoiceLineItem {
    fn default() -> Self {
        Self {
            description: default_item_description(),
            quantity: default_item_quantity(),
            unit_price: 0.0,
            amount: 0.0,
        }
    }
}

/// Complete analysis of a single invoice document
///
/// Created once per document by the analysis pipeline, normalized once, then
/// immutable. The normalizer guarantees presence and types for every field;
/// it deliberately does not enforce cross-field consistency (for example
/// `reimbursable_amount <= amount`), so a model verdict is surfaced as-is
/// for reviewers rather than silently rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAnalysis {
    /// Receipt number when the model found one, else the source filename
    pub invoice_id: String,

    /// Employee the batch was submitted for
    pub employee_name: String,

    /// Vendor / merchant name
    #[serde(default = "default_vendor_name")]
    pub vendor_name: String,

    /// Invoice date as written, nominally YYYY-MM-DD; format unvalidated
    #[serde(default)]
    pub date: Option<String>,

    /// Invoice total in source currency
    pub amount: f64,

    /// Expense category
    pub category: ExpenseCategory,

    /// Line items, possibly empty
    #[serde(rename = "items", default)]
    pub line_items: Vec<InvoiceLineItem>,

    /// Reimbursement decision
    pub status: ReimbursementStatus,

    /// Amount actually reimbursable under policy
    pub reimbursable_amount: f64,

    /// Human-readable policy violations, possibly empty
    #[serde(default)]
    pub policy_violations: Vec<String>,

    /// Model's explanation of the decision
    pub reasoning: String,

    /// Whether any line item contains alcohol
    #[serde(default)]
    pub contains_alcohol: bool,

    /// Whether the invoice falls within the submission window
    #[serde(default = "default_submission_date_valid")]
    pub submission_date_valid: bool,
}

fn default_vendor_name() -> String {
    "Unknown Vendor".to_string()
}

fn default_submission_date_valid() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_round_trip() {
        for category in [
            ExpenseCategory::Food,
            ExpenseCategory::Travel,
            ExpenseCategory::Accommodation,
            ExpenseCategory::Transport,
        ] {
            assert_eq!(ExpenseCategory::from_wire(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_unknown_wire_string() {
        assert_eq!(ExpenseCategory::from_wire("entertainment"), None);
        assert_eq!(ExpenseCategory::from_wire(""), None);
    }

    #[test]
    fn test_status_wire_round_trip() {
        for status in [
            ReimbursementStatus::Approved,
            ReimbursementStatus::Declined,
            ReimbursementStatus::PartialApproved,
            ReimbursementStatus::PendingReview,
        ] {
            assert_eq!(ReimbursementStatus::from_wire(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&ReimbursementStatus::PartialApproved).unwrap();
        assert_eq!(json, r#""partial_approved""#);
    }

    #[test]
    fn test_line_item_defaults() {
        let item = InvoiceLineItem::default();
        assert_eq!(item.description, "Unknown Item");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);
        assert_eq!(item.amount, 0.0);
    }

    #[test]
    fn test_line_item_deserialize_partial() {
        let item: InvoiceLineItem =
            serde_json::from_str(r#"{"description": "Veg Thali", "amount": 180.0}"#).unwrap();
        assert_eq!(item.description, "Veg Thali");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.amount, 180.0);
    }

    #[test]
    fn test_analysis_serializes_items_key() {
        let analysis = InvoiceAnalysis {
            invoice_id: "INV-001".to_string(),
            employee_name: "Priya Sharma".to_string(),
            vendor_name: "Cafe Aroma".to_string(),
            date: Some("2025-06-14".to_string()),
            amount: 180.0,
            category: ExpenseCategory::Food,
            line_items: vec![InvoiceLineItem::default()],
            status: ReimbursementStatus::Approved,
            reimbursable_amount: 180.0,
            policy_violations: vec![],
            reasoning: "Within the meal cap".to_string(),
            contains_alcohol: false,
            submission_date_valid: true,
        };

        let value = serde_json::to_value(&analysis).unwrap();
        assert!(value.get("items").is_some());
        assert!(value.get("line_items").is_none());
    }
}
