//! Wire types for the remote chat API.

use chainchat_types::remote::ContextFilter;
use serde::{Deserialize, Serialize};

/// `POST /session` request body.
#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    pub title: &'a str,
}

/// `POST /session` response body. The session id lives under `result`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionResponse {
    pub result: SessionResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionResult {
    pub id: String,
}

/// `POST /chat` request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_filter: Option<&'a ContextFilter>,
}

/// `POST /chat` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub message: String,
}
