//! Prompt templates for invoice analysis and chat replies
//!
//! Both templates render the policy caps from the [`PolicyRules`] table, so
//! configuration and prompts cannot drift apart.

use bursar_domain::PolicyRules;

/// Context documents beyond this many are dropped from the chat prompt
pub const CHAT_CONTEXT_LIMIT: usize = 5;

/// Builds the structured-analysis prompt for one invoice document
pub struct PromptBuilder<'a> {
    policy: &'a PolicyRules,
    document_text: &'a str,
    filename: &'a str,
    employee_name: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for one document
    pub fn new(
        policy: &'a PolicyRules,
        document_text: &'a str,
        filename: &'a str,
        employee_name: &'a str,
    ) -> Self {
        Self {
            policy,
            document_text,
            filename,
            employee_name,
        }
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let c = &self.policy.currency;
        let mut prompt = String::new();

        prompt.push_str(
            "Analyze this invoice text against the company reimbursement policy.\n\n",
        );

        prompt.push_str("COMPANY POLICY:\n");
        prompt.push_str(&format!(
            "- Food & Beverages: {}{} per meal{}\n",
            c,
            fmt_amount(self.policy.meal_cap),
            if self.policy.alcohol_declines {
                " (NO ALCOHOL - automatic decline)"
            } else {
                ""
            }
        ));
        prompt.push_str(&format!(
            "- Travel: {}{} per trip + {}{} daily office cabs\n",
            c,
            fmt_amount(self.policy.trip_cap),
            c,
            fmt_amount(self.policy.daily_transport_cap)
        ));
        prompt.push_str(&format!(
            "- Accommodation: {}{} per night\n",
            c,
            fmt_amount(self.policy.nightly_lodging_cap)
        ));
        prompt.push_str(&format!(
            "- Submit within {} days with receipts\n\n",
            self.policy.submission_window_days
        ));

        prompt.push_str("INVOICE TEXT:\n");
        prompt.push_str(self.document_text);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("EMPLOYEE: {}\n", self.employee_name));
        prompt.push_str(&format!("FILENAME: {}\n\n", self.filename));

        prompt.push_str("Return ONLY valid JSON with this exact structure:\n");
        prompt.push_str(&format!(
            r#"{{
    "invoice_id": "receipt_number_or_filename",
    "employee_name": "{}",
    "vendor_name": "vendor_name",
    "date": "YYYY-MM-DD",
    "amount": 0.0,
    "category": "food",
    "items": [{{"description": "item", "quantity": 1, "unit_price": 0.0, "amount": 0.0}}],
    "status": "approved",
    "reimbursable_amount": 0.0,
    "policy_violations": [],
    "reasoning": "explanation",
    "contains_alcohol": false,
    "submission_date_valid": true
}}"#,
            self.employee_name
        ));
        prompt.push_str("\n\n");

        prompt.push_str("ANALYSIS RULES:\n");
        prompt.push_str(&format!(
            "1. ANY alcohol (wine, whisky, beer, vodka, rum, spirits) -> status=\"declined\", reimbursable_amount=0\n\
             2. Food > {}{meal} -> status=\"partial_approved\", reimbursable_amount={meal}\n\
             3. Travel > {}{trip} -> status=\"partial_approved\", reimbursable_amount={trip}\n\
             4. Daily transport > {}{cab} -> status=\"partial_approved\", reimbursable_amount={cab}\n\
             5. Detect alcohol keywords carefully in item descriptions\n",
            c,
            c,
            c,
            meal = fmt_amount(self.policy.meal_cap),
            trip = fmt_amount(self.policy.trip_cap),
            cab = fmt_amount(self.policy.daily_transport_cap)
        ));

        prompt
    }
}

/// Build the retrieval-backed chat prompt
pub fn chat_prompt(policy: &PolicyRules, query: &str, context_docs: &[String]) -> String {
    let context = if context_docs.is_empty() {
        "No relevant documents found.".to_string()
    } else {
        context_docs
            .iter()
            .take(CHAT_CONTEXT_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let c = &policy.currency;
    format!(
        "You are an assistant for the invoice reimbursement system.\n\n\
         CONTEXT FROM DATABASE:\n{context}\n\n\
         USER QUERY: {query}\n\n\
         COMPANY POLICY:\n\
         - Food: {c}{meal} per meal{alcohol}\n\
         - Travel: {c}{trip} per trip + {c}{cab} daily cabs\n\
         - Accommodation: {c}{night} per night\n\
         - {window}-day submission deadline\n\n\
         Provide a helpful response in markdown format based on the context.",
        meal = fmt_amount(policy.meal_cap),
        alcohol = if policy.alcohol_declines { " (no alcohol)" } else { "" },
        trip = fmt_amount(policy.trip_cap),
        cab = fmt_amount(policy.daily_transport_cap),
        night = fmt_amount(policy.nightly_lodging_cap),
        window = policy.submission_window_days,
    )
}

/// Render a cap without a trailing ".0" when it is a whole amount
fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
