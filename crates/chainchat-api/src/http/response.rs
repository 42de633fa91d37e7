//! Envelope response format for all API responses.
//!
//! Every success response is wrapped in a consistent envelope:
//! ```json
//! { "success": true, "data": { ... } }
//! ```
//! Errors use `{ "success": false, "message": "..." }` (see
//! [`crate::http::error::AppError`]).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Envelope wrapping all successful API data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true; error responses are built by `AppError`.
    pub success: bool,

    /// The main response payload.
    pub data: T,

    /// HTTP status to respond with (200 or 201).
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 OK envelope.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            status: StatusCode::OK,
        }
    }

    /// A 201 Created envelope, used when the request minted new documents.
    pub fn created(data: T) -> Self {
        Self {
            success: true,
            data,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"success":false,"message":"Failed to serialize response"}"#.to_string()
        });

        (
            self.status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
