//! Contract report HTTP handler.
//!
//! `POST /api/contract` anchors a session to a deployed contract: it asks the
//! remote service for the structured function report, stores a system-side
//! "context updated" message plus the report as a bot message, and returns
//! both documents.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use chainchat_core::session::ContractContext;
use chainchat_types::chain::ChainId;
use chainchat_types::message::Message;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /api/contract`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequest {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub contract_address: Option<String>,
    pub chain_id: Option<ChainId>,
}

/// Response payload for `POST /api/contract`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub system_message: Message,
    pub bot_message: Message,
    pub session_id: String,
    pub is_new_session: bool,
}

/// POST /api/contract -- fetch and persist the structured contract report.
pub async fn query_contract(
    State(state): State<AppState>,
    Json(body): Json<ContractRequest>,
) -> Result<ApiResponse<ContractResponse>, AppError> {
    let user_id = body
        .user_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Please Login for contract details".to_string()))?;

    let (contract_address, chain_id) = match (body.contract_address, body.chain_id) {
        (Some(address), Some(chain)) if !address.is_empty() => (address, chain.into_string()),
        _ => {
            return Err(AppError::Validation(
                "Contract address and chain ID are required".to_string(),
            ));
        }
    };

    let context = ContractContext::new(Some(contract_address.clone()), Some(chain_id.clone()));

    let ensured = state
        .session_service
        .ensure_session(&user_id, body.session_id.as_deref(), None, &context)
        .await?;
    let session_id = ensured.session_id;

    let report = state
        .exchange_service
        .fetch_contract_report(&contract_address, &chain_id, &session_id)
        .await?;

    let system_text =
        format!("Context updated to Contract: {contract_address} on Chain ID: {chain_id}");
    let system_doc = state
        .exchange_service
        .save_user_message(&user_id, &session_id, &system_text)
        .await?;

    let bot_doc = state
        .exchange_service
        .save_bot_message(&user_id, &session_id, &report)
        .await?;

    Ok(ApiResponse::created(ContractResponse {
        system_message: system_doc,
        bot_message: bot_doc,
        session_id,
        is_new_session: ensured.is_new,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_request_parses() {
        let body: ContractRequest = serde_json::from_str(
            r#"{"userId":"u1","contractAddress":"0xabc","chainId":"137"}"#,
        )
        .unwrap();
        assert_eq!(body.contract_address.as_deref(), Some("0xabc"));
        assert_eq!(body.chain_id.unwrap().as_str(), "137");
    }

    #[test]
    fn test_contract_response_wire_shape() {
        let response = ContractResponse {
            system_message: Message::user("u1", "s1", "Context updated"),
            bot_message: Message::bot("u1", "s1", "### Contract Details:"),
            session_id: "s1".to_string(),
            is_new_session: false,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"systemMessage\":{"));
        assert!(json.contains("\"isNewSession\":false"));
    }
}
