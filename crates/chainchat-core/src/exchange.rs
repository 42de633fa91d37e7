//! Exchange persistence and the send-path session recovery.
//!
//! An exchange is one user message paired with one bot reply, stored as two
//! separate rows. The user row is saved before the reply is known; the two
//! saves are independent and a crash between them leaves a valid partial
//! exchange.
//!
//! The remote service can silently invalidate a session. When a send fails
//! with the recognized invalid-session signature, [`ExchangeService::fetch_reply`]
//! mints a replacement session and retries the same message exactly once; the
//! caller then adopts the replacement so the local thread stays continuous.

use chainchat_types::conversation::Conversation;
use chainchat_types::error::ChatError;
use chainchat_types::message::Message;
use chrono::Utc;
use tracing::{info, warn};

use crate::remote::RemoteChatApi;
use crate::repository::{ConversationRepository, MessageRepository};
use crate::session::ContractContext;

/// A remote reply, plus the replacement session id when recovery kicked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Set when the original session was rejected and a fresh one answered
    /// the retry. The caller must adopt it before persisting the reply.
    pub replacement: Option<String>,
}

/// Persists exchanges and talks to the remote service on the send path.
pub struct ExchangeService<C, M, R>
where
    C: ConversationRepository,
    M: MessageRepository,
    R: RemoteChatApi,
{
    conversations: C,
    messages: M,
    remote: R,
}

impl<C, M, R> ExchangeService<C, M, R>
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

    /// Insert the user side of an exchange and stamp conversation activity.
    pub async fn save_user_message(
        &self,
        user_id: &str,
        session_id: &str,
        text: &str,
    ) -> Result<Message, ChatError> {
        let message = Message::user(user_id, session_id, text);
        self.messages.insert(&message).await?;
        self.conversations
            .touch_activity(session_id, Utc::now())
            .await?;
        Ok(message)
    }

    /// Insert the bot side of an exchange and stamp conversation activity.
    pub async fn save_bot_message(
        &self,
        user_id: &str,
        session_id: &str,
        text: &str,
    ) -> Result<Message, ChatError> {
        let message = Message::bot(user_id, session_id, text);
        self.messages.insert(&message).await?;
        self.conversations
            .touch_activity(session_id, Utc::now())
            .await?;
        Ok(message)
    }

    /// Fetch the remote reply for a user message.
    ///
    /// On an invalid-session failure: create a brand-new remote session,
    /// retry once, and report the replacement. Any other failure -- or a
    /// failed retry -- propagates with the remote error text intact.
    pub async fn fetch_reply(
        &self,
        text: &str,
        session_id: &str,
        context: &ContractContext,
    ) -> Result<Reply, ChatError> {
        let filter = context.filter();

        match self
            .remote
            .send_message(text, session_id, filter.as_ref())
            .await
        {
            Ok(reply) => Ok(Reply {
                text: reply,
                replacement: None,
            }),
            Err(err) if err.is_session_rejected() => {
                warn!(session_id = %session_id, error = %err, "remote rejected session, minting replacement");

                let new_session_id = self.remote.create_session(None).await?;
                let reply = self
                    .remote
                    .send_message(text, &new_session_id, filter.as_ref())
                    .await?;

                Ok(Reply {
                    text: reply,
                    replacement: Some(new_session_id),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch the structured contract report for a session.
    pub async fn fetch_contract_report(
        &self,
        contract_address: &str,
        chain_id: &str,
        session_id: &str,
    ) -> Result<String, ChatError> {
        let report = self
            .remote
            .query_contract(contract_address, chain_id, session_id)
            .await?;
        Ok(report)
    }

    /// Re-point the conversation and all its messages at a replacement
    /// session id. Both updates are issued concurrently and must complete.
    pub async fn adopt_replacement(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> Result<(), ChatError> {
        let (conversation, messages) = tokio::join!(
            self.conversations
                .replace_session_id(old_session_id, new_session_id),
            self.messages
                .reassign_session(old_session_id, new_session_id),
        );
        conversation?;
        let moved = messages?;

        info!(
            old_session_id = %old_session_id,
            new_session_id = %new_session_id,
            moved,
            "adopted replacement session"
        );
        Ok(())
    }

    /// Conversation metadata plus the full ordered message list.
    pub async fn history(
        &self,
        session_id: &str,
    ) -> Result<(Conversation, Vec<Message>), ChatError> {
        let (conversation, messages) = tokio::join!(
            self.conversations.find_by_session(session_id),
            self.messages.list_for_session(session_id),
        );

        let conversation =
            conversation?.ok_or_else(|| ChatError::NotFound("Session not found".to_string()))?;
        Ok((conversation, messages?))
    }
}
