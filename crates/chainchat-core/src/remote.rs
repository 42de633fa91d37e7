//! Remote chat service port.
//!
//! The hosted blockchain-analysis chat API is a black box behind this trait:
//! session create/delete plus two query shapes. The concrete HTTP adapter
//! lives in chainchat-infra; services here never see reqwest.

use chainchat_types::error::RemoteApiError;
use chainchat_types::remote::ContextFilter;

/// Client trait for the remote chat service.
///
/// All calls are single synchronous round trips -- no retry or backoff at
/// this layer. Failures carry the remote error text so callers can recognize
/// the invalid-session signature.
pub trait RemoteChatApi: Send + Sync {
    /// Create a remote session and return its opaque identifier.
    /// `title` falls back to the configured default when absent.
    fn create_session(
        &self,
        title: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, RemoteApiError>> + Send;

    /// Delete a remote session. Validates the id is well-formed before any
    /// HTTP round trip and fails fast with `InvalidSessionId` otherwise.
    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RemoteApiError>> + Send;

    /// Send a chat message within a session; returns the reply text.
    fn send_message(
        &self,
        text: &str,
        session_id: &str,
        filter: Option<&ContextFilter>,
    ) -> impl std::future::Future<Output = Result<String, RemoteApiError>> + Send;

    /// Ask for the structured markdown report of a deployed contract;
    /// returns the reply text.
    fn query_contract(
        &self,
        contract_address: &str,
        chain_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<String, RemoteApiError>> + Send;
}
