//! Chat exchange HTTP handlers.
//!
//! - `POST /api/chat` -- send a user message, get the bot reply. Saving the
//!   user message and fetching the remote reply run concurrently; if the
//!   remote silently invalidated the session, the one-shot recovery in the
//!   exchange service mints a replacement and this handler re-points the
//!   stored thread before saving the reply.
//! - `GET /api/chat?sessionId=` -- full ordered history for a session.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use chainchat_core::session::ContractContext;
use chainchat_types::chain::ChainId;
use chainchat_types::conversation::Conversation;
use chainchat_types::message::Message;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: Option<String>,
    /// Existing session to continue; absent or unknown starts a new thread.
    pub session_id: Option<String>,
    pub user_message: Option<String>,
    pub contract_address: Option<String>,
    pub chain_id: Option<ChainId>,
}

/// Response payload for `POST /api/chat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub user_message: Message,
    pub bot_message: Message,
    pub session_id: String,
    pub is_new_session: bool,
}

/// POST /api/chat -- send a message and get the bot response.
pub async fn send_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<ApiResponse<ChatResponse>, AppError> {
    let user_id = body
        .user_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Please Login for chat".to_string()))?;

    let user_message = body
        .user_message
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("No user message provided".to_string()))?;

    let context = ContractContext::new(
        body.contract_address,
        body.chain_id.map(ChainId::into_string),
    );

    let ensured = state
        .session_service
        .ensure_session(&user_id, body.session_id.as_deref(), None, &context)
        .await?;
    let session_id = ensured.session_id;

    // Save the user message while the remote call is in flight.
    let (user_doc, reply) = tokio::join!(
        state
            .exchange_service
            .save_user_message(&user_id, &session_id, &user_message),
        state
            .exchange_service
            .fetch_reply(&user_message, &session_id, &context),
    );
    let mut user_doc = user_doc?;
    let reply = reply?;

    // The remote replaced the session: re-point the stored thread and use
    // the new id for the rest of the response.
    let final_session_id = match reply.replacement {
        Some(new_session_id) => {
            state
                .exchange_service
                .adopt_replacement(&session_id, &new_session_id)
                .await?;
            user_doc.session_id = new_session_id.clone();
            new_session_id
        }
        None => session_id,
    };

    let bot_doc = state
        .exchange_service
        .save_bot_message(&user_id, &final_session_id, &reply.text)
        .await?;

    Ok(ApiResponse::created(ChatResponse {
        user_message: user_doc,
        bot_message: bot_doc,
        session_id: final_session_id,
        is_new_session: ensured.is_new,
    }))
}

/// Query parameters for `GET /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub session_id: Option<String>,
}

/// Response payload for `GET /api/chat`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
    pub conversation: Conversation,
}

/// GET /api/chat?sessionId= -- chat history for a session.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<ApiResponse<HistoryResponse>, AppError> {
    let session_id = query
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("sessionId is required".to_string()))?;

    let (conversation, messages) = state.exchange_service.history(&session_id).await?;

    Ok(ApiResponse::success(HistoryResponse {
        messages,
        conversation,
    }))
}
