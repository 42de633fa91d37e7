//! Message types for chainchat.
//!
//! One row per utterance: a user turn sets `user_message`, a bot turn sets
//! `bot_message`, never both. An exchange is two rows sharing a session id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single utterance within a session, ordered by `timestamp` ascending.
///
/// A user message persisted without its paired bot reply is a valid,
/// displayable state (the reply may still be in flight, or may have failed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub user_message: Option<String>,
    pub bot_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user-side message row.
    pub fn user(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            user_message: Some(text.into()),
            bot_message: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a bot-side message row.
    pub fn bot(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            user_message: None,
            bot_message: Some(text.into()),
            timestamp: Utc::now(),
        }
    }

    /// Whether this row is the user side of an exchange.
    pub fn is_user(&self) -> bool {
        self.user_message.is_some()
    }
}
