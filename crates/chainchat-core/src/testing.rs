//! In-memory fakes for service tests.
//!
//! Plain synchronous state behind mutexes; no lock is held across an await.
//! The remote fake is scriptable: individual sessions (or all of them) can be
//! made to fail with the invalid-session signature, and creates/deletes can
//! be forced to fail.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chainchat_types::conversation::{Conversation, ConversationSummary};
use chainchat_types::error::{RemoteApiError, RepositoryError};
use chainchat_types::message::Message;
use chainchat_types::remote::ContextFilter;
use chrono::{DateTime, Utc};

use crate::remote::RemoteChatApi;
use crate::repository::{ConversationRepository, MessageRepository};

#[derive(Default)]
pub(crate) struct FakeConversations {
    inner: Mutex<Vec<Conversation>>,
}

impl ConversationRepository for FakeConversations {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .iter()
            .any(|c| c.session_id == conversation.session_id)
        {
            return Err(RepositoryError::Conflict(format!(
                "session id '{}' already exists",
                conversation.session_id
            )));
        }
        inner.push(conversation.clone());
        Ok(conversation.clone())
    }

    async fn find_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.iter().find(|c| c.session_id == session_id).cloned())
    }

    async fn find_owned(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .iter()
            .find(|c| c.session_id == session_id && c.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<&Conversation> =
            inner.iter().filter(|c| c.user_id == user_id).collect();
        matching.sort_by(|a, b| b.last_chat_time.cmp(&a.last_chat_time));
        Ok(matching
            .into_iter()
            .map(|c| ConversationSummary {
                session_id: c.session_id.clone(),
                title: c.title.clone(),
                last_chat_time: c.last_chat_time,
            })
            .collect())
    }

    async fn count_for_user(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.iter().filter(|c| c.user_id == user_id).count() as u64)
    }

    async fn oldest_for_user(&self, user_id: &str) -> Result<Option<Conversation>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .iter()
            .filter(|c| c.user_id == user_id)
            .min_by_key(|c| c.last_chat_time)
            .cloned())
    }

    async fn touch_activity(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(conv) = inner.iter_mut().find(|c| c.session_id == session_id) {
            conv.last_chat_time = at;
        }
        Ok(())
    }

    async fn update_metadata(
        &self,
        session_id: &str,
        contract_address: Option<&str>,
        chain_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(conv) = inner.iter_mut().find(|c| c.session_id == session_id) {
            if let Some(address) = contract_address {
                conv.contract_address = Some(address.to_string());
            }
            if let Some(chain) = chain_id {
                conv.chain_id = Some(chain.to_string());
            }
        }
        Ok(())
    }

    async fn replace_session_id(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.iter_mut().find(|c| c.session_id == old_session_id) {
            Some(conv) => {
                conv.session_id = new_session_id.to_string();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.len();
        inner.retain(|c| c.session_id != session_id);
        if inner.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeMessages {
    inner: Mutex<Vec<Message>>,
}

impl MessageRepository for FakeMessages {
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError> {
        self.inner.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<Message> = inner
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by_key(|m| m.timestamp);
        Ok(matching)
    }

    async fn reassign_session(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let mut moved = 0;
        for message in inner.iter_mut().filter(|m| m.session_id == old_session_id) {
            message.session_id = new_session_id.to_string();
            moved += 1;
        }
        Ok(moved)
    }

    async fn delete_for_session(&self, session_id: &str) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.len();
        inner.retain(|m| m.session_id != session_id);
        Ok((before - inner.len()) as u64)
    }
}

#[derive(Default)]
pub(crate) struct FakeRemote {
    minted: AtomicU64,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    sends: AtomicU64,
    rejected: Mutex<HashSet<String>>,
    reject_all: AtomicBool,
    fail_creates: bool,
    fail_deletes: bool,
    send_failure: Mutex<Option<String>>,
}

impl FakeRemote {
    /// Every create_session call fails.
    pub(crate) fn failing_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    /// Every delete_session call fails.
    pub(crate) fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Sends to this session id fail with the invalid-session signature.
    pub(crate) fn reject_session(&self, session_id: &str) {
        self.rejected
            .lock()
            .unwrap()
            .insert(session_id.to_string());
    }

    /// Sends to any session fail with the invalid-session signature.
    pub(crate) fn reject_all_sessions(&self) {
        self.reject_all.store(true, Ordering::SeqCst);
    }

    /// Sends fail with an unrelated remote error.
    pub(crate) fn fail_sends_with(&self, message: &str) {
        *self.send_failure.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub(crate) fn send_count(&self) -> u64 {
        self.sends.load(Ordering::SeqCst)
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

impl RemoteChatApi for FakeRemote {
    async fn create_session(&self, _title: Option<&str>) -> Result<String, RemoteApiError> {
        if self.fail_creates {
            return Err(RemoteApiError::Api {
                status: 500,
                message: "failed to create session".to_string(),
            });
        }
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = format!("minted-{n}");
        self.created.lock().unwrap().push(session_id.clone());
        Ok(session_id)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), RemoteApiError> {
        if self.fail_deletes {
            return Err(RemoteApiError::Api {
                status: 500,
                message: "failed to delete session".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(session_id.to_string());
        Ok(())
    }

    async fn send_message(
        &self,
        text: &str,
        session_id: &str,
        _filter: Option<&ContextFilter>,
    ) -> Result<String, RemoteApiError> {
        self.sends.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.send_failure.lock().unwrap().clone() {
            return Err(RemoteApiError::Api {
                status: 500,
                message,
            });
        }

        let rejected = self.reject_all.load(Ordering::SeqCst)
            || self.rejected.lock().unwrap().contains(session_id);
        if rejected {
            return Err(RemoteApiError::Api {
                status: 422,
                message: format!("'{session_id}' is not a valid hexadecimal UUID string"),
            });
        }

        Ok(format!("reply to '{text}'"))
    }

    async fn query_contract(
        &self,
        contract_address: &str,
        chain_id: &str,
        session_id: &str,
    ) -> Result<String, RemoteApiError> {
        self.send_message(
            &format!("contract report for {contract_address} on chain {chain_id}"),
            session_id,
            None,
        )
        .await
    }
}
