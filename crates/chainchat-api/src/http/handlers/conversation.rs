//! Conversation lifecycle HTTP handlers.
//!
//! - `GET    /api/conversations?userId=`             -- list a user's threads
//! - `POST   /api/conversations`                     -- create (evicting past the cap)
//! - `DELETE /api/conversations?sessionId=&userId=`  -- delete one thread

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use chainchat_types::conversation::{Conversation, ConversationSummary};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/conversations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
}

/// GET /api/conversations?userId= -- list conversations, newest activity first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<ConversationSummary>>, AppError> {
    let user_id = query
        .user_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Please Login for chat".to_string()))?;

    let conversations = state.lifecycle_service.list_conversations(&user_id).await?;

    Ok(ApiResponse::success(conversations))
}

/// Request body for `POST /api/conversations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub user_id: Option<String>,
    pub title: Option<String>,
}

/// Response payload for `POST /api/conversations`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub conversation: Conversation,
    pub reached_limit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/conversations -- create a conversation for a user.
///
/// `reachedLimit` is true when this creation evicted the user's oldest
/// conversation to stay within the cap.
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<CreateRequest>,
) -> Result<ApiResponse<CreateResponse>, AppError> {
    let user_id = body
        .user_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;

    let created = state
        .lifecycle_service
        .create_conversation(&user_id, body.title.as_deref())
        .await?;

    let message = created.reached_limit.then(|| {
        "Reached maximum conversations limit. Oldest conversation was removed.".to_string()
    });

    Ok(ApiResponse::created(CreateResponse {
        conversation: created.conversation,
        reached_limit: created.reached_limit,
        message,
    }))
}

/// Query parameters for `DELETE /api/conversations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub session_id: Option<String>,
    pub user_id: Option<String>,
}

/// Response payload for `DELETE /api/conversations`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted: bool,
    pub session_id: String,
}

/// DELETE /api/conversations?sessionId=&userId= -- delete one conversation.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<ApiResponse<DeleteResponse>, AppError> {
    let (session_id, user_id) = match (query.session_id, query.user_id) {
        (Some(session), Some(user)) if !session.is_empty() && !user.is_empty() => (session, user),
        _ => {
            return Err(AppError::Validation(
                "sessionId and userId are required".to_string(),
            ));
        }
    };

    state
        .lifecycle_service
        .delete_conversation(&user_id, &session_id)
        .await?;

    Ok(ApiResponse::success(DeleteResponse {
        deleted: true,
        session_id,
    }))
}
