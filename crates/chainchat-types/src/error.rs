use thiserror::Error;

/// Errors from repository operations (used by trait definitions in chainchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the remote chat service client.
#[derive(Debug, Error)]
pub enum RemoteApiError {
    /// The session id failed local validation; no HTTP request was made.
    #[error("invalid session id: '{0}' is not a well-formed UUID")]
    InvalidSessionId(String),

    /// The remote service answered with a non-success status.
    /// `message` carries the remote error body verbatim.
    #[error("remote API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode remote response: {0}")]
    Deserialization(String),
}

impl RemoteApiError {
    /// Whether this error matches the remote's expired/invalid-session
    /// signature. The remote does not use a structured code for this; it is
    /// recognizable only by substrings of the error text.
    ///
    /// A match triggers the one-shot recreate-and-retry recovery path instead
    /// of surfacing to the caller.
    pub fn is_session_rejected(&self) -> bool {
        match self {
            RemoteApiError::Api { message, .. } => {
                message.contains("session ID") || message.contains("hexadecimal UUID")
            }
            _ => false,
        }
    }
}

/// Top-level error for chat orchestration, mapped to HTTP statuses in the API
/// layer: Validation -> 400, NotFound -> 404, everything else -> 500.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Remote(#[from] RemoteApiError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
