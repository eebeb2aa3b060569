//! Retrieval-backed chat with per-conversation history

use crate::analyst::Analyst;
use crate::prompt::CHAT_CONTEXT_LIMIT;
use bursar_domain::traits::LlmProvider;
use bursar_domain::{ChatResponse, ConversationTurn};
use bursar_store::InvoiceIndex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::error;
use uuid::Uuid;

/// Answers queries over analyzed invoices, one conversation at a time
///
/// The conversation table lives on the engine instance and is injected at
/// construction, never a process global; tests build a fresh engine each.
/// Histories grow monotonically for the life of the process.
pub struct ChatEngine<L> {
    analyst: Arc<Analyst<L>>,
    index: Arc<InvoiceIndex>,
    sessions: Mutex<HashMap<String, Vec<ConversationTurn>>>,
}

impl<L> ChatEngine<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a chat engine over the shared analyst and index
    pub fn new(analyst: Arc<Analyst<L>>, index: Arc<InvoiceIndex>) -> Self {
        Self {
            analyst,
            index,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Answer one query, continuing the conversation when an id is supplied
    ///
    /// The conversation id is echoed (or freshly generated) even on failure
    /// so the client can retry in-session. Retrieval misses are not
    /// failures: an empty index just means the reply is generated without
    /// context.
    pub async fn respond(&self, query: &str, conversation_id: Option<String>) -> ChatResponse {
        let conversation_id =
            conversation_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let context = self.index.search(query, CHAT_CONTEXT_LIMIT);
        let response_text = self.analyst.chat_reply(query, &context).await;

        match self.sessions.lock() {
            Ok(mut sessions) => {
                let history = sessions.entry(conversation_id.clone()).or_default();
                history.push(ConversationTurn::user(query));
                history.push(ConversationTurn::assistant(response_text.clone()));
            }
            Err(e) => {
                error!("Chat processing failed: {}", e);
                return ChatResponse {
                    response: format!("I apologize, but I encountered an error: {}", e),
                    sources: vec![],
                    conversation_id,
                    success: false,
                };
            }
        }

        let sources = (1..=context.len())
            .map(|i| format!("Document {}", i))
            .collect();

        ChatResponse {
            response: response_text,
            sources,
            conversation_id,
            success: true,
        }
    }

    /// Snapshot of one conversation's history
    pub fn history(&self, conversation_id: &str) -> Option<Vec<ConversationTurn>> {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| sessions.get(conversation_id).cloned())
    }

    /// Number of conversations seen so far
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }
}
