//! MessageRepository trait definition.

use chainchat_types::error::RepositoryError;
use chainchat_types::message::Message;

/// Repository trait for message persistence.
///
/// Messages are correlated to conversations through the remote session id;
/// the bulk `reassign_session` operation is what keeps that correlation intact
/// when a remote session is replaced.
pub trait MessageRepository: Send + Sync {
    /// Insert a single message row.
    fn insert(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages for a session, ordered by timestamp ascending.
    fn list_for_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Re-point every message from an old session id to its replacement.
    /// Returns the number of rows moved.
    fn reassign_session(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete all messages for a session. Returns the number of rows removed.
    fn delete_for_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
