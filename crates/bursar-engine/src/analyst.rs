//! Per-document analysis against the text-generation provider

use crate::error::AnalystError;
use crate::normalize::{fallback_fields, normalize_record};
use crate::parser::extract_json_object;
use crate::prompt::{chat_prompt, PromptBuilder};
use bursar_domain::traits::LlmProvider;
use bursar_domain::{InvoiceAnalysis, PolicyRules};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Classifies one invoice document at a time and answers chat queries
///
/// Both entry points are total functions: a provider failure or an
/// unparseable response degrades to a deterministic result instead of an
/// error. The provider is called exactly once per document - resilience is
/// traded for predictable latency, and a failed call goes straight to the
/// pending-review fallback.
pub struct Analyst<L> {
    provider: Arc<L>,
    policy: PolicyRules,
}

impl<L> Analyst<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create an analyst over a provider and policy table
    pub fn new(provider: L, policy: PolicyRules) -> Self {
        Self {
            provider: Arc::new(provider),
            policy,
        }
    }

    /// The policy table this analyst classifies against
    pub fn policy(&self) -> &PolicyRules {
        &self.policy
    }

    /// Analyze one extracted document
    ///
    /// Always returns a structurally complete record. The happy path parses
    /// the provider's JSON payload; every failure lands in the fallback
    /// branch, and both feed the same normalization.
    pub async fn analyze_document(
        &self,
        document_text: &str,
        filename: &str,
        employee_name: &str,
    ) -> InvoiceAnalysis {
        let raw = match self.request_analysis(document_text, filename, employee_name).await {
            Ok(fields) => {
                info!("Successfully analyzed: {}", filename);
                fields
            }
            Err(e) => {
                error!("Analysis failed for {}: {}", filename, e);
                fallback_fields(filename, employee_name, &e.to_string())
            }
        };

        normalize_record(raw, filename, employee_name)
    }

    /// One provider round-trip plus payload recovery
    async fn request_analysis(
        &self,
        document_text: &str,
        filename: &str,
        employee_name: &str,
    ) -> Result<Map<String, Value>, AnalystError> {
        let prompt =
            PromptBuilder::new(&self.policy, document_text, filename, employee_name).build();

        let response = self.call_provider(prompt).await?;
        extract_json_object(&response)
    }

    /// Generate a chat reply over retrieved context documents
    ///
    /// On provider failure the reply is an apology carrying the cause; chat
    /// never errors outward.
    pub async fn chat_reply(&self, query: &str, context_docs: &[String]) -> String {
        let prompt = chat_prompt(&self.policy, query, context_docs);

        match self.call_provider(prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!("Chat response failed: {}", e);
                format!("I apologize, but I encountered an error: {}", e)
            }
        }
    }

    /// Run the sync provider call on a blocking-capable thread
    async fn call_provider(&self, prompt: String) -> Result<String, AnalystError> {
        let provider = Arc::clone(&self.provider);

        tokio::task::spawn_blocking(move || {
            provider
                .generate(&prompt)
                .map_err(|e| AnalystError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| AnalystError::Provider(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bursar_domain::ReimbursementStatus;
    use bursar_llm::MockProvider;

    fn analyst(provider: MockProvider) -> Analyst<MockProvider> {
        Analyst::new(provider, PolicyRules::default())
    }

    #[tokio::test]
    async fn test_analyze_parses_model_payload() {
        let provider = MockProvider::default();
        provider.push_response(
            r#"{"invoice_id": "RCPT-9", "amount": 180.0, "status": "approved",
                "reimbursable_amount": 180.0, "reasoning": "Within the meal cap"}"#,
        );

        let record = analyst(provider)
            .analyze_document("Lunch ₹180", "inv1.pdf", "Priya Sharma")
            .await;

        assert_eq!(record.invoice_id, "RCPT-9");
        assert_eq!(record.status, ReimbursementStatus::Approved);
        assert_eq!(record.employee_name, "Priya Sharma");
    }

    #[tokio::test]
    async fn test_analyze_strips_fenced_payload() {
        let provider = MockProvider::default();
        provider.push_response("```json\n{\"status\": \"declined\", \"amount\": 900.0, \"reimbursable_amount\": 0.0}\n```");

        let record = analyst(provider)
            .analyze_document("Whisky ₹900", "inv2.pdf", "Priya Sharma")
            .await;

        assert_eq!(record.status, ReimbursementStatus::Declined);
    }

    #[tokio::test]
    async fn test_unparseable_response_becomes_pending_review() {
        let provider = MockProvider::new("Sorry, I cannot read this document.");

        let record = analyst(provider)
            .analyze_document("???", "inv3.pdf", "Priya Sharma")
            .await;

        assert_eq!(record.status, ReimbursementStatus::PendingReview);
        assert_eq!(record.reimbursable_amount, 0.0);
        assert_eq!(record.invoice_id, "inv3.pdf");
        assert!(record.policy_violations[0].starts_with("Processing error:"));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_pending_review() {
        let provider = MockProvider::default();
        provider.push_error("quota exhausted");

        let record = analyst(provider)
            .analyze_document("Lunch ₹180", "inv4.pdf", "Priya Sharma")
            .await;

        assert_eq!(record.status, ReimbursementStatus::PendingReview);
        assert!(record.reasoning.contains("Manual review required"));
        assert!(record.policy_violations[0].contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_chat_reply_happy_path() {
        let provider = MockProvider::new("Priya has two approved invoices.");

        let reply = analyst(provider)
            .chat_reply("what is approved?", &["Invoice: INV-1".to_string()])
            .await;

        assert_eq!(reply, "Priya has two approved invoices.");
    }

    #[tokio::test]
    async fn test_chat_reply_on_provider_failure() {
        let provider = MockProvider::default();
        provider.push_error("model overloaded");

        let reply = analyst(provider).chat_reply("anything?", &[]).await;

        assert!(reply.starts_with("I apologize"));
        assert!(reply.contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_exactly_one_provider_call_per_document() {
        let provider = MockProvider::new("not json");
        let handle = provider.clone();

        analyst(provider)
            .analyze_document("text", "inv.pdf", "A")
            .await;

        assert_eq!(handle.call_count(), 1);
    }
}
