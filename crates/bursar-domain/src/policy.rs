//! Reimbursement policy constants as an explicit configuration table
//!
//! The caps live here as data rather than inline prompt prose, so the prompt
//! template and any future rule engine render from the same source.

use serde::{Deserialize, Serialize};

/// Per-category reimbursement caps and submission rules
///
/// Amounts are in the company's reporting currency. Overridable from the
/// server's TOML configuration; defaults match the published policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRules {
    /// Cap per meal
    #[serde(default = "default_meal_cap")]
    pub meal_cap: f64,

    /// Cap per inter-city trip
    #[serde(default = "default_trip_cap")]
    pub trip_cap: f64,

    /// Cap per day for office cabs / local transport
    #[serde(default = "default_daily_transport_cap")]
    pub daily_transport_cap: f64,

    /// Cap per night for lodging
    #[serde(default = "default_nightly_lodging_cap")]
    pub nightly_lodging_cap: f64,

    /// Days after the invoice date within which it must be submitted
    #[serde(default = "default_submission_window_days")]
    pub submission_window_days: u32,

    /// Whether any alcohol on an invoice declines it outright
    #[serde(default = "default_alcohol_declines")]
    pub alcohol_declines: bool,

    /// Currency symbol used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_meal_cap() -> f64 {
    200.0
}

fn default_trip_cap() -> f64 {
    2000.0
}

fn default_daily_transport_cap() -> f64 {
    150.0
}

fn default_nightly_lodging_cap() -> f64 {
    50.0
}

fn default_submission_window_days() -> u32 {
    30
}

fn default_alcohol_declines() -> bool {
    true
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for PolicyRules {
    fn default() -> Self {
        Self {
            meal_cap: default_meal_cap(),
            trip_cap: default_trip_cap(),
            daily_transport_cap: default_daily_transport_cap(),
            nightly_lodging_cap: default_nightly_lodging_cap(),
            submission_window_days: default_submission_window_days(),
            alcohol_declines: default_alcohol_declines(),
            currency: default_currency(),
        }
    }
}

impl PolicyRules {
    /// Validate the table
    pub fn validate(&self) -> Result<(), String> {
        if self.meal_cap < 0.0
            || self.trip_cap < 0.0
            || self.daily_transport_cap < 0.0
            || self.nightly_lodging_cap < 0.0
        {
            return Err("policy caps must be non-negative".to_string());
        }
        if self.submission_window_days == 0 {
            return Err("submission_window_days must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = PolicyRules::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.meal_cap, 200.0);
        assert_eq!(policy.trip_cap, 2000.0);
        assert_eq!(policy.daily_transport_cap, 150.0);
        assert_eq!(policy.nightly_lodging_cap, 50.0);
        assert_eq!(policy.submission_window_days, 30);
        assert!(policy.alcohol_declines);
    }

    #[test]
    fn test_negative_cap_rejected() {
        let mut policy = PolicyRules::default();
        policy.meal_cap = -1.0;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_zero_submission_window_rejected() {
        let mut policy = PolicyRules::default();
        policy.submission_window_days = 0;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let policy: PolicyRules = serde_json::from_str(r#"{"meal_cap": 300.0}"#).unwrap();
        assert_eq!(policy.meal_cap, 300.0);
        assert_eq!(policy.trip_cap, 2000.0);
        assert_eq!(policy.currency, "₹");
    }
}
