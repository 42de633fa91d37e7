//! Conversation lifecycle and per-user quota enforcement.
//!
//! A user keeps at most [`MAX_CONVERSATIONS_PER_USER`] conversations. Creating
//! one past the cap first evicts the least-recently-active conversation:
//! best-effort remote session deletion (a remote failure is logged and never
//! blocks local cleanup), then the local row and its messages go together.
//!
//! The cap is a soft limit: two racing creations can both pass the count check
//! and transiently exceed it. There is no cross-request locking here.

use chainchat_types::conversation::{Conversation, ConversationSummary};
use chainchat_types::error::ChatError;
use chrono::Utc;
use tracing::{info, warn};

use crate::remote::RemoteChatApi;
use crate::repository::{ConversationRepository, MessageRepository};

/// Maximum number of stored conversations per user.
pub const MAX_CONVERSATIONS_PER_USER: u64 = 5;

/// Outcome of an explicit conversation creation.
#[derive(Debug, Clone)]
pub struct CreatedConversation {
    pub conversation: Conversation,
    /// True when this creation evicted the user's oldest conversation.
    pub reached_limit: bool,
}

/// Manages explicit conversation creation, deletion, and listing.
pub struct LifecycleService<C, M, R>
where
    C: ConversationRepository,
    M: MessageRepository,
    R: RemoteChatApi,
{
    conversations: C,
    messages: M,
    remote: R,
}

impl<C, M, R> LifecycleService<C, M, R>
where
    C: ConversationRepository,
    M: MessageRepository,
    R: RemoteChatApi,
{
    pub fn new(conversations: C, messages: M, remote: R) -> Self {
        Self {
            conversations,
            messages,
            remote,
        }
    }

    /// Create a conversation for a user, evicting the oldest one first when
    /// the user is at the cap.
    ///
    /// `reached_limit` reports whether an eviction actually happened during
    /// this creation, not whether the pre-creation count looked full.
    pub async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<&str>,
    ) -> Result<CreatedConversation, ChatError> {
        let count = self.conversations.count_for_user(user_id).await?;

        let mut reached_limit = false;
        if count >= MAX_CONVERSATIONS_PER_USER {
            if let Some(oldest) = self.conversations.oldest_for_user(user_id).await? {
                self.remove_everywhere(&oldest.session_id).await?;
                reached_limit = true;
                info!(
                    session_id = %oldest.session_id,
                    user_id = %user_id,
                    limit = MAX_CONVERSATIONS_PER_USER,
                    "evicted oldest conversation to stay within limit"
                );
            }
        }

        let session_id = self.remote.create_session(title).await?;

        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Conversation {}", Utc::now().format("%Y-%m-%d %H:%M:%S")));
        let conversation = self
            .conversations
            .create(&Conversation::new(user_id, session_id, title))
            .await?;

        Ok(CreatedConversation {
            conversation,
            reached_limit,
        })
    }

    /// Delete a conversation owned by the user, remote session included.
    ///
    /// Unknown session or wrong owner -> NotFound.
    pub async fn delete_conversation(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), ChatError> {
        self.conversations
            .find_owned(session_id, user_id)
            .await?
            .ok_or_else(|| ChatError::NotFound("Conversation not found".to_string()))?;

        self.remove_everywhere(session_id).await
    }

    /// A user's conversations, most recent activity first.
    pub async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, ChatError> {
        Ok(self.conversations.list_for_user(user_id).await?)
    }

    /// Best-effort remote deletion, then local cascade.
    ///
    /// Local consistency takes priority over remote tidiness: a remote
    /// failure is logged and swallowed, the local deletes still run. The two
    /// local deletes are issued concurrently.
    async fn remove_everywhere(&self, session_id: &str) -> Result<(), ChatError> {
        if let Err(err) = self.remote.delete_session(session_id).await {
            warn!(session_id = %session_id, error = %err, "failed to delete remote session, continuing with local cleanup");
        }

        let (conversation, messages) = tokio::join!(
            self.conversations.delete_by_session(session_id),
            self.messages.delete_for_session(session_id),
        );
        conversation?;
        messages?;
        Ok(())
    }
}
