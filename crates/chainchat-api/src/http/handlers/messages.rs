//! Stateless one-shot message handler.
//!
//! `POST /api/messages` relays a message to the remote service without
//! touching the store: no conversation record, no message rows. A missing
//! session id gets a fresh remote session whose id is returned to the caller
//! but intentionally not recorded locally.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use chainchat_core::remote::RemoteChatApi;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /api/messages`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatelessRequest {
    pub user_message: Option<String>,
    pub session_id: Option<String>,
}

/// Response payload for `POST /api/messages`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatelessResponse {
    pub message: String,
    pub session_id: String,
}

/// POST /api/messages -- relay a message without persistence.
pub async fn send_stateless(
    State(state): State<AppState>,
    Json(body): Json<StatelessRequest>,
) -> Result<ApiResponse<StatelessResponse>, AppError> {
    let user_message = body
        .user_message
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Missing userMessage".to_string()))?;

    let session_id = match body.session_id.filter(|s| !s.is_empty()) {
        Some(session_id) => session_id,
        None => state.remote.create_session(None).await?,
    };

    let message = state
        .remote
        .send_message(&user_message, &session_id, None)
        .await?;

    Ok(ApiResponse::success(StatelessResponse {
        message,
        session_id,
    }))
}
