//! Conversation types for chainchat.
//!
//! A `Conversation` is the locally persisted thread metadata (owner, title,
//! activity time) keyed by the remote session id. The remote chat service owns
//! the session itself; the conversation record is what keeps the thread
//! continuous for the user when the remote session is replaced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Locally persisted conversation metadata.
///
/// `session_id` is the opaque identifier issued by the remote chat service and
/// is unique across the store. It is rewritten in place when the remote session
/// is silently invalidated and replaced.
///
/// Field names serialize in camelCase: these documents are returned verbatim
/// to the web client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub title: String,
    /// Contract the thread is anchored to, when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    pub last_chat_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation record stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            title: title.into(),
            contract_address: None,
            chain_id: None,
            last_chat_time: now,
            created_at: now,
        }
    }

    /// Attach contract metadata to the record.
    pub fn with_contract(mut self, address: Option<String>, chain_id: Option<String>) -> Self {
        self.contract_address = address;
        self.chain_id = chain_id;
        self
    }
}

/// Projection of a conversation for sidebar listings.
///
/// Only the fields the client renders: `{ sessionId, title, lastChatTime }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub session_id: String,
    pub title: String,
    pub last_chat_time: DateTime<Utc>,
}
