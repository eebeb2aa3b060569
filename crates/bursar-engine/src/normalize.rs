//! Total normalization of raw analysis payloads
//!
//! Whatever the model returned - and whatever the fallback path built - goes
//! through [`normalize_record`] before anything else sees it. The function
//! never fails: absent or malformed fields get fixed defaults, so every
//! document in a batch yields a structurally complete record. It is
//! idempotent; re-normalizing a normalized record changes nothing.

use bursar_domain::{
    ExpenseCategory, InvoiceAnalysis, InvoiceLineItem, ReimbursementStatus,
};
use serde_json::{Map, Value};
use tracing::debug;

type JsonMap = Map<String, Value>;

/// Repair a raw payload into a complete analysis record
pub fn normalize_record(raw: JsonMap, filename: &str, employee_name: &str) -> InvoiceAnalysis {
    let mut defaults_applied = 0usize;

    let invoice_id = string_field(&raw, "invoice_id")
        .unwrap_or_else(|| bump(&mut defaults_applied, filename.to_string()));
    let employee = string_field(&raw, "employee_name")
        .unwrap_or_else(|| bump(&mut defaults_applied, employee_name.to_string()));
    let vendor_name = string_field(&raw, "vendor_name")
        .unwrap_or_else(|| bump(&mut defaults_applied, "Unknown Vendor".to_string()));

    let date = raw
        .get("date")
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    // Numeric trust is all-or-nothing: if either amount fails coercion,
    // both are zeroed.
    let amount = raw.get("amount").and_then(coerce_number);
    let reimbursable_amount = raw.get("reimbursable_amount").and_then(coerce_number);
    let (amount, reimbursable_amount) = match (amount, reimbursable_amount) {
        (Some(a), Some(r)) => (a, r),
        _ => {
            defaults_applied += 1;
            (0.0, 0.0)
        }
    };

    let category = raw
        .get("category")
        .and_then(Value::as_str)
        .and_then(ExpenseCategory::from_wire)
        .unwrap_or_else(|| bump(&mut defaults_applied, ExpenseCategory::default()));
    let status = raw
        .get("status")
        .and_then(Value::as_str)
        .and_then(ReimbursementStatus::from_wire)
        .unwrap_or_else(|| bump(&mut defaults_applied, ReimbursementStatus::default()));

    let line_items = raw
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_line_item).collect())
        .unwrap_or_default();

    let policy_violations = raw
        .get("policy_violations")
        .and_then(Value::as_array)
        .map(|violations| {
            violations
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    let reasoning = string_field(&raw, "reasoning")
        .unwrap_or_else(|| bump(&mut defaults_applied, "Analysis completed".to_string()));
    let contains_alcohol = raw
        .get("contains_alcohol")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let submission_date_valid = raw
        .get("submission_date_valid")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    if defaults_applied > 0 {
        debug!(
            "Applied {} default(s) normalizing {}",
            defaults_applied, invoice_id
        );
    }

    InvoiceAnalysis {
        invoice_id,
        employee_name: employee,
        vendor_name,
        date,
        amount,
        category,
        line_items,
        status,
        reimbursable_amount,
        policy_violations,
        reasoning,
        contains_alcohol,
        submission_date_valid,
    }
}

/// The deterministic payload substituted when a model attempt fails
///
/// All required fields are present; normalization treats it exactly like a
/// parsed model response.
pub fn fallback_fields(filename: &str, employee_name: &str, cause: &str) -> JsonMap {
    let mut map = Map::new();
    map.insert("invoice_id".into(), Value::from(filename));
    map.insert("employee_name".into(), Value::from(employee_name));
    map.insert("vendor_name".into(), Value::from("Unknown Vendor"));
    map.insert("date".into(), Value::Null);
    map.insert("amount".into(), Value::from(0.0));
    map.insert("category".into(), Value::from("food"));
    map.insert("items".into(), Value::Array(vec![]));
    map.insert("status".into(), Value::from("pending_review"));
    map.insert("reimbursable_amount".into(), Value::from(0.0));
    map.insert(
        "policy_violations".into(),
        Value::Array(vec![Value::from(format!("Processing error: {}", cause))]),
    );
    map.insert(
        "reasoning".into(),
        Value::from(format!(
            "Could not analyze due to error: {}. Manual review required.",
            cause
        )),
    );
    map.insert("contains_alcohol".into(), Value::from(false));
    map.insert("submission_date_valid".into(), Value::from(true));
    map
}

fn bump<T>(counter: &mut usize, value: T) -> T {
    *counter += 1;
    value
}

/// Read a string-ish field: strings pass through, numbers are rendered
/// (receipt numbers arrive as integers often enough to matter)
fn string_field(raw: &JsonMap, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value to f64: numbers directly, numeric strings parsed
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_line_item(value: &Value) -> Option<InvoiceLineItem> {
    let item = value.as_object()?;

    Some(InvoiceLineItem {
        description: string_field(item, "description")
            .unwrap_or_else(|| "Unknown Item".to_string()),
        quantity: item
            .get("quantity")
            .and_then(Value::as_u64)
            .map(|q| q as u32)
            .unwrap_or(1),
        unit_price: item.get("unit_price").and_then(coerce_number).unwrap_or(0.0),
        amount: item.get("amount").and_then(coerce_number).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> JsonMap {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_payload_gets_all_defaults() {
        let record = normalize_record(Map::new(), "inv1.pdf", "Priya Sharma");

        assert_eq!(record.invoice_id, "inv1.pdf");
        assert_eq!(record.employee_name, "Priya Sharma");
        assert_eq!(record.vendor_name, "Unknown Vendor");
        assert_eq!(record.date, None);
        assert_eq!(record.amount, 0.0);
        assert_eq!(record.category, ExpenseCategory::Food);
        assert!(record.line_items.is_empty());
        assert_eq!(record.status, ReimbursementStatus::PendingReview);
        assert_eq!(record.reimbursable_amount, 0.0);
        assert!(record.policy_violations.is_empty());
        assert_eq!(record.reasoning, "Analysis completed");
        assert!(!record.contains_alcohol);
        assert!(record.submission_date_valid);
    }

    #[test]
    fn test_complete_payload_passes_through() {
        let record = normalize_record(
            raw(r#"{
                "invoice_id": "RCPT-881",
                "employee_name": "Priya Sharma",
                "vendor_name": "Cafe Aroma",
                "date": "2025-06-14",
                "amount": 350.0,
                "category": "food",
                "items": [{"description": "Dinner buffet", "quantity": 1, "unit_price": 350.0, "amount": 350.0}],
                "status": "partial_approved",
                "reimbursable_amount": 200.0,
                "policy_violations": ["Meal exceeds cap"],
                "reasoning": "Amount above the meal cap",
                "contains_alcohol": false,
                "submission_date_valid": true
            }"#),
            "inv1.pdf",
            "Priya Sharma",
        );

        assert_eq!(record.invoice_id, "RCPT-881");
        assert_eq!(record.status, ReimbursementStatus::PartialApproved);
        assert_eq!(record.reimbursable_amount, 200.0);
        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.policy_violations, vec!["Meal exceeds cap"]);
    }

    #[test]
    fn test_numeric_invoice_id_rendered() {
        let record = normalize_record(raw(r#"{"invoice_id": 4471}"#), "inv1.pdf", "A");
        assert_eq!(record.invoice_id, "4471");
    }

    #[test]
    fn test_amount_accepts_numeric_string() {
        let record = normalize_record(
            raw(r#"{"amount": "350.5", "reimbursable_amount": "200"}"#),
            "inv1.pdf",
            "A",
        );
        assert_eq!(record.amount, 350.5);
        assert_eq!(record.reimbursable_amount, 200.0);
    }

    #[test]
    fn test_one_bad_amount_zeroes_both() {
        let record = normalize_record(
            raw(r#"{"amount": 350.0, "reimbursable_amount": "two hundred"}"#),
            "inv1.pdf",
            "A",
        );
        assert_eq!(record.amount, 0.0);
        assert_eq!(record.reimbursable_amount, 0.0);
    }

    #[test]
    fn test_unknown_enum_strings_fall_back() {
        let record = normalize_record(
            raw(r#"{"category": "entertainment", "status": "maybe"}"#),
            "inv1.pdf",
            "A",
        );
        assert_eq!(record.category, ExpenseCategory::Food);
        assert_eq!(record.status, ReimbursementStatus::PendingReview);
    }

    #[test]
    fn test_malformed_line_items_skipped() {
        let record = normalize_record(
            raw(r#"{"items": ["just a string", {"description": "Chai"}, 42]}"#),
            "inv1.pdf",
            "A",
        );
        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].description, "Chai");
        assert_eq!(record.line_items[0].quantity, 1);
    }

    #[test]
    fn test_non_string_violations_skipped() {
        let record = normalize_record(
            raw(r#"{"policy_violations": ["Alcohol on bill", 17]}"#),
            "inv1.pdf",
            "A",
        );
        assert_eq!(record.policy_violations, vec!["Alcohol on bill"]);
    }

    #[test]
    fn test_fallback_fields_normalize_to_pending_review() {
        let record = normalize_record(
            fallback_fields("inv1.pdf", "Priya Sharma", "model timed out"),
            "inv1.pdf",
            "Priya Sharma",
        );

        assert_eq!(record.status, ReimbursementStatus::PendingReview);
        assert_eq!(record.reimbursable_amount, 0.0);
        assert_eq!(
            record.policy_violations,
            vec!["Processing error: model timed out"]
        );
        assert!(record.reasoning.contains("Manual review required"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize_record(
            raw(r#"{"amount": 350.0, "status": "declined", "contains_alcohol": true}"#),
            "inv1.pdf",
            "Priya Sharma",
        );

        let reserialized = match serde_json::to_value(&first).unwrap() {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let second = normalize_record(reserialized, "inv1.pdf", "Priya Sharma");

        assert_eq!(first, second);
    }
}
