//! Chat loop tests: retrieval context, provenance labels, session history

use bursar_domain::{ExpenseCategory, InvoiceAnalysis, PolicyRules, ReimbursementStatus, Role};
use bursar_engine::{Analyst, ChatEngine};
use bursar_llm::MockProvider;
use bursar_store::InvoiceIndex;
use std::sync::Arc;

fn indexed_record(invoice_id: &str, reasoning: &str) -> InvoiceAnalysis {
    InvoiceAnalysis {
        invoice_id: invoice_id.to_string(),
        employee_name: "Priya Sharma".to_string(),
        vendor_name: "Cafe Aroma".to_string(),
        date: Some("2025-06-14".to_string()),
        amount: 180.0,
        category: ExpenseCategory::Food,
        line_items: vec![],
        status: ReimbursementStatus::Approved,
        reimbursable_amount: 180.0,
        policy_violations: vec![],
        reasoning: reasoning.to_string(),
        contains_alcohol: false,
        submission_date_valid: true,
    }
}

fn engine(provider: MockProvider, index: Arc<InvoiceIndex>) -> ChatEngine<MockProvider> {
    let analyst = Arc::new(Analyst::new(provider, PolicyRules::default()));
    ChatEngine::new(analyst, index)
}

#[tokio::test]
async fn test_chat_with_empty_index_still_succeeds() {
    let engine = engine(
        MockProvider::new("No invoices have been analyzed yet."),
        Arc::new(InvoiceIndex::new()),
    );

    let response = engine.respond("what has been analyzed?", None).await;

    assert!(response.success);
    assert!(response.sources.is_empty());
    assert!(!response.response.is_empty());
    assert!(!response.conversation_id.is_empty());
}

#[tokio::test]
async fn test_chat_labels_retrieved_documents() {
    let index = Arc::new(InvoiceIndex::new());
    index.add(&indexed_record("INV-1", "approved meal"), "Veg Thali lunch receipt");
    index.add(&indexed_record("INV-2", "approved meal"), "Masala Dosa lunch receipt");

    let engine = engine(MockProvider::new("Both lunches were approved."), index);
    let response = engine.respond("lunch receipts?", None).await;

    assert!(response.success);
    assert_eq!(
        response.sources,
        vec!["Document 1".to_string(), "Document 2".to_string()]
    );
}

#[tokio::test]
async fn test_chat_context_capped_at_five_documents() {
    let index = Arc::new(InvoiceIndex::new());
    for i in 0..9 {
        index.add(
            &indexed_record(&format!("INV-{}", i), "approved meal"),
            "lunch receipt",
        );
    }

    let engine = engine(MockProvider::new("summary"), index);
    let response = engine.respond("lunch", None).await;

    assert_eq!(response.sources.len(), 5);
}

#[tokio::test]
async fn test_conversation_continues_across_turns() {
    let index = Arc::new(InvoiceIndex::new());
    let engine = engine(MockProvider::new("reply"), index);

    let first = engine.respond("first question", None).await;
    let second = engine
        .respond("follow-up", Some(first.conversation_id.clone()))
        .await;

    assert_eq!(first.conversation_id, second.conversation_id);

    let history = engine.history(&first.conversation_id).unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[2].text, "follow-up");
}

#[tokio::test]
async fn test_provider_failure_keeps_session_alive() {
    let provider = MockProvider::default();
    provider.push_error("upstream outage");
    provider.push_response("Back to normal.");
    let engine = engine(provider, Arc::new(InvoiceIndex::new()));

    let first = engine.respond("query", Some("conv-9".to_string())).await;
    assert!(first.response.starts_with("I apologize"));

    // The degraded turn is still recorded and the next turn proceeds.
    let second = engine.respond("retry", Some("conv-9".to_string())).await;
    assert_eq!(second.response, "Back to normal.");
    assert_eq!(engine.history("conv-9").unwrap().len(), 4);
}
