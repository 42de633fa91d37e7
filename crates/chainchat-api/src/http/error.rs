//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chainchat_types::error::{ChatError, RemoteApiError};

/// Application-level error that maps to HTTP responses.
///
/// Every variant renders as `{ "success": false, "message": "..." }`:
/// Validation -> 400, NotFound -> 404, Internal -> 500. Remote-service
/// failures surface their error text verbatim in the 500 body.
#[derive(Debug)]
pub enum AppError {
    /// Client input error (missing/invalid field).
    Validation(String),
    /// Unknown session or conversation.
    NotFound(String),
    /// Remote or storage failure.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(msg) => AppError::Validation(msg),
            ChatError::NotFound(msg) => AppError::NotFound(msg),
            ChatError::Remote(err) => AppError::Internal(err.to_string()),
            ChatError::Repository(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<RemoteApiError> for AppError {
    fn from(e: RemoteApiError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
