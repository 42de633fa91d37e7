//! Session reconciliation.
//!
//! Guarantees that an inbound request ends up with a valid remote session and
//! a matching local conversation record. Three cases per request:
//!
//! 1. No session id supplied -> create remote session + local conversation.
//! 2. Session id supplied but unknown locally -> same as (1).
//! 3. Session id known -> reuse it, refreshing contract metadata if supplied.
//!
//! Remote session creation failure is fatal to the request. The separate
//! send-path recovery (remote silently invalidated the session) lives in
//! [`crate::exchange`].

use chainchat_types::conversation::Conversation;
use chainchat_types::error::ChatError;
use chainchat_types::remote::ContextFilter;
use chrono::Utc;
use tracing::info;

use crate::remote::RemoteChatApi;
use crate::repository::ConversationRepository;

/// Optional contract anchoring carried by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractContext {
    pub contract_address: Option<String>,
    pub chain_id: Option<String>,
}

impl ContractContext {
    pub fn new(contract_address: Option<String>, chain_id: Option<String>) -> Self {
        Self {
            contract_address,
            chain_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contract_address.is_none() && self.chain_id.is_none()
    }

    /// Remote context filter, present only when both halves are known.
    pub fn filter(&self) -> Option<ContextFilter> {
        match (&self.contract_address, &self.chain_id) {
            (Some(address), Some(chain)) => Some(ContextFilter::for_contract(address, chain)),
            _ => None,
        }
    }
}

/// Outcome of session reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredSession {
    pub session_id: String,
    pub is_new: bool,
}

/// Reconciles client-supplied session ids against the local store and the
/// remote service.
pub struct SessionService<C: ConversationRepository, R: RemoteChatApi> {
    conversations: C,
    remote: R,
}

impl<C: ConversationRepository, R: RemoteChatApi> SessionService<C, R> {
    pub fn new(conversations: C, remote: R) -> Self {
        Self {
            conversations,
            remote,
        }
    }

    /// Ensure a valid session exists for this request.
    ///
    /// `title` overrides the generated one only when a new conversation is
    /// created. Reusing an existing session updates stored contract metadata
    /// when the request supplies any.
    pub async fn ensure_session(
        &self,
        user_id: &str,
        initial_session_id: Option<&str>,
        title: Option<&str>,
        context: &ContractContext,
    ) -> Result<EnsuredSession, ChatError> {
        if let Some(initial) = initial_session_id {
            if let Some(existing) = self.conversations.find_by_session(initial).await? {
                if !context.is_empty() {
                    self.conversations
                        .update_metadata(
                            &existing.session_id,
                            context.contract_address.as_deref(),
                            context.chain_id.as_deref(),
                        )
                        .await?;
                }
                return Ok(EnsuredSession {
                    session_id: existing.session_id,
                    is_new: false,
                });
            }
        }

        let session_id = self.remote.create_session(None).await?;

        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| generate_session_title(context));
        let conversation = Conversation::new(user_id, &session_id, title)
            .with_contract(context.contract_address.clone(), context.chain_id.clone());
        self.conversations.create(&conversation).await?;

        info!(session_id = %session_id, user_id = %user_id, "created conversation for new remote session");

        Ok(EnsuredSession {
            session_id,
            is_new: true,
        })
    }
}

/// Title for an implicitly created conversation.
///
/// `"Contract {first 8 chars}... on Chain {id}"` when anchored to a contract,
/// otherwise a timestamped generic title.
pub fn generate_session_title(context: &ContractContext) -> String {
    match (&context.contract_address, &context.chain_id) {
        (Some(address), Some(chain)) => {
            let prefix: String = address.chars().take(8).collect();
            format!("Contract {prefix}... on Chain {chain}")
        }
        _ => format!("Chat {}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
    }
}
