//! NebulaClient -- concrete [`RemoteChatApi`] implementation for the hosted
//! blockchain-analysis chat service.
//!
//! Single synchronous HTTP round trips with no retry/backoff; failures carry
//! the remote error body so callers can recognize the invalid-session
//! signature. The secret key is wrapped in [`secrecy::SecretString`] and is
//! only exposed when building the `x-secret-key` request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use chainchat_core::remote::RemoteChatApi;
use chainchat_types::config::RemoteConfig;
use chainchat_types::error::RemoteApiError;
use chainchat_types::remote::ContextFilter;

use super::types::{ChatRequest, ChatResponse, CreateSessionRequest, CreateSessionResponse};

/// HTTP client for the remote chat service.
///
/// # Secret key security
///
/// The key is stored as a [`SecretString`] and never appears in Debug output,
/// Display output, or tracing logs. The struct intentionally does not derive
/// Debug.
pub struct NebulaClient {
    client: reqwest::Client,
    secret_key: SecretString,
    base_url: String,
    default_session_title: String,
}

impl NebulaClient {
    /// Create a new client from the remote configuration.
    pub fn new(secret_key: SecretString, config: &RemoteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            secret_key,
            base_url: config.base_url.clone(),
            default_session_title: config.default_session_title.clone(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request with auth headers and map transport failures.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteApiError> {
        let response = request
            .header("x-secret-key", self.secret_key.expose_secret())
            .header("content-type", "application/json")
            .send()
            .await
            .map_err(|e| RemoteApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RemoteApiError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        Ok(response)
    }
}

impl RemoteChatApi for NebulaClient {
    async fn create_session(&self, title: Option<&str>) -> Result<String, RemoteApiError> {
        let body = CreateSessionRequest {
            title: title.unwrap_or(&self.default_session_title),
        };

        let response = self
            .send(self.client.post(self.url("/session")).json(&body))
            .await?;

        let parsed: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| RemoteApiError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(parsed.result.id)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), RemoteApiError> {
        // The remote rejects malformed ids anyway; validating locally saves
        // the round trip and keeps the failure typed.
        if Uuid::parse_str(session_id).is_err() {
            return Err(RemoteApiError::InvalidSessionId(session_id.to_string()));
        }

        self.send(
            self.client
                .delete(self.url(&format!("/session/{session_id}"))),
        )
        .await?;

        Ok(())
    }

    async fn send_message(
        &self,
        text: &str,
        session_id: &str,
        filter: Option<&ContextFilter>,
    ) -> Result<String, RemoteApiError> {
        let body = ChatRequest {
            message: text,
            session_id,
            context_filter: filter,
        };

        let response = self
            .send(self.client.post(self.url("/chat")).json(&body))
            .await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RemoteApiError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(parsed.message)
    }

    async fn query_contract(
        &self,
        contract_address: &str,
        chain_id: &str,
        session_id: &str,
    ) -> Result<String, RemoteApiError> {
        let prompt = contract_report_prompt(contract_address, chain_id);
        let filter = ContextFilter::for_contract(contract_address, chain_id);
        self.send_message(&prompt, session_id, Some(&filter)).await
    }
}

/// The fixed-format prompt for the structured contract report.
///
/// The layout is part of the product contract: the web client renders the
/// reply as markdown and expects these exact section headings, and the
/// literal "None available." for empty categories.
fn contract_report_prompt(contract_address: &str, chain_id: &str) -> String {
    format!(
        r#"Give me the details of this contract and provide a structured list of all functions available in the smart contract deployed at address {contract_address} on chain {chain_id}. The response must strictly follow this format:

### Contract Details:
- **Name:** <contractName>
- **Address:** <contractAddress>
- **Chain ID:** <chainId>
- **Blockchain:** <blockchainName>

### Read-only Functions:
1. **`<functionName(parameters)`**
   - **Returns:** <returnType>
   - **Description:** <brief description>

### Write-able Functions:
1. **`<functionName(parameters)`**
   - **Returns:** <returnType>
   - **Description:** <brief description>
   - **Payable:** <true/false>
   - **Parameters:** <parameterName> <parameterType> <parameterDescription>

If no functions exist in a category, include "None available." Ensure accuracy and conciseness."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SESSION: &str = "11111111-2222-3333-4444-555555555555";

    fn make_client(base_url: String) -> NebulaClient {
        let config = RemoteConfig {
            base_url,
            ..RemoteConfig::default()
        };
        NebulaClient::new(SecretString::from("test-key-not-real"), &config)
    }

    #[tokio::test]
    async fn test_create_session_returns_result_id() {
        let mut server = mockito::Server::new_async().await;
        let handler = server
            .mock("POST", "/session")
            .match_header("x-secret-key", "test-key-not-real")
            .with_status(200)
            .with_body(r#"{"result":{"id":"fresh-session-id"}}"#)
            .create_async()
            .await;

        let client = make_client(server.url());
        let session_id = client.create_session(None).await.unwrap();

        assert_eq!(session_id, "fresh-session-id");
        handler.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_session_sends_default_title() {
        let mut server = mockito::Server::new_async().await;
        let handler = server
            .mock("POST", "/session")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"title":"Smart Contract Explorer"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"result":{"id":"x"}}"#)
            .create_async()
            .await;

        make_client(server.url()).create_session(None).await.unwrap();
        handler.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_posts_context_filter() {
        let mut server = mockito::Server::new_async().await;
        let handler = server
            .mock("POST", "/chat")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"session_id":"abc","context_filter":{"chain_ids":["137"],"contract_addresses":["0xabc"]}}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"message":"the reply"}"#)
            .create_async()
            .await;

        let client = make_client(server.url());
        let filter = ContextFilter::for_contract("0xabc", "137");
        let reply = client
            .send_message("hello", "abc", Some(&filter))
            .await
            .unwrap();

        assert_eq!(reply, "the reply");
        handler.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced_and_recognizable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat")
            .with_status(422)
            .with_body("value is not a valid hexadecimal UUID string")
            .create_async()
            .await;

        let client = make_client(server.url());
        let err = client.send_message("hello", "stale", None).await.unwrap_err();

        match &err {
            RemoteApiError::Api { status, message } => {
                assert_eq!(*status, 422);
                assert!(message.contains("hexadecimal UUID"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_session_rejected());
    }

    #[tokio::test]
    async fn test_delete_session_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let handler = server
            .mock("DELETE", format!("/session/{TEST_SESSION}").as_str())
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        make_client(server.url())
            .delete_session(TEST_SESSION)
            .await
            .unwrap();
        handler.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_session_rejects_malformed_id_without_http() {
        let mut server = mockito::Server::new_async().await;
        let handler = server
            .mock("DELETE", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = make_client(server.url())
            .delete_session("not-a-uuid")
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteApiError::InvalidSessionId(_)));
        handler.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_contract_sends_report_prompt() {
        let mut server = mockito::Server::new_async().await;
        let handler = server
            .mock("POST", "/chat")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"context_filter":{"chain_ids":["1"],"contract_addresses":["0xdead"]}}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(r####"{"message":"### Contract Details:"}"####)
            .create_async()
            .await;

        let report = make_client(server.url())
            .query_contract("0xdead", "1", TEST_SESSION)
            .await
            .unwrap();

        assert!(report.starts_with("### Contract Details:"));
        handler.assert_async().await;
    }

    #[test]
    fn test_contract_prompt_layout() {
        let prompt = contract_report_prompt("0xdead", "137");
        assert!(prompt.contains("address 0xdead on chain 137"));
        assert!(prompt.contains("### Contract Details:"));
        assert!(prompt.contains("### Read-only Functions:"));
        assert!(prompt.contains("### Write-able Functions:"));
        assert!(prompt.contains("\"None available.\""));
        assert!(prompt.contains("- **Payable:** <true/false>"));
    }
}
