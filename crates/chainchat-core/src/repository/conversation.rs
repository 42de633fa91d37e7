//! ConversationRepository trait definition.

use chainchat_types::conversation::{Conversation, ConversationSummary};
use chainchat_types::error::RepositoryError;
use chrono::{DateTime, Utc};

/// Repository trait for conversation persistence.
///
/// Conversations are keyed by the remote `session_id` (unique within the
/// store); the local row id exists only as a primary key. Implementations
/// live in chainchat-infra.
pub trait ConversationRepository: Send + Sync {
    /// Insert a new conversation. Fails with `Conflict` when the session id
    /// is already taken.
    fn create(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Look up a conversation by its remote session id.
    fn find_by_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Look up a conversation by session id, scoped to its owner.
    fn find_owned(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, most recent activity first.
    fn list_for_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, RepositoryError>> + Send;

    /// Count a user's conversations.
    fn count_for_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// The user's single least-recently-active conversation, if any.
    fn oldest_for_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Stamp the conversation's last activity time.
    fn touch_activity(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Update contract metadata. `None` fields keep their stored values.
    fn update_metadata(
        &self,
        session_id: &str,
        contract_address: Option<&str>,
        chain_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Rewrite the conversation's session id after the remote session was
    /// replaced. Fails with `NotFound` when the old id is unknown.
    fn replace_session_id(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete the conversation row for a session id.
    fn delete_by_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
