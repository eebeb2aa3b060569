//! Conversation types for the retrieval-backed chat interface

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The querying client
    User,
    /// The generated reply
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Speaker
    pub role: Role,
    /// Turn text
    pub text: String,
}

impl ConversationTurn {
    /// A user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// An assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Chat request body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Natural-language question over analyzed invoices
    pub query: String,

    /// Existing conversation to continue; a fresh id is generated when absent
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Chat response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated reply text
    pub response: String,

    /// Generic provenance labels for the retrieved context documents
    #[serde(default)]
    pub sources: Vec<String>,

    /// Conversation id, echoed or freshly generated (also on failure, so the
    /// client can retry in-session)
    pub conversation_id: String,

    /// False when the engine could not complete the query
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let turn = ConversationTurn::user("how much did I spend?");
        assert_eq!(turn.role, Role::User);

        let turn = ConversationTurn::assistant("you spent ₹430");
        assert_eq!(turn.role, Role::Assistant);
    }

    #[test]
    fn test_chat_request_without_conversation_id() {
        let request: ChatRequest = serde_json::from_str(r#"{"query": "status of my invoices"}"#).unwrap();
        assert_eq!(request.query, "status of my invoices");
        assert!(request.conversation_id.is_none());
    }
}
