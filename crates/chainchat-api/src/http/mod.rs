//! HTTP/REST API layer for chainchat.
//!
//! Axum-based REST API at `/api/` with the `{ success, data }` envelope
//! format and CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
