//! Wire types shared with the remote chat service.

use serde::{Deserialize, Serialize};

/// Context filter narrowing a remote chat query to specific chains/contracts.
///
/// Serialized snake_case: this struct goes on the wire to the remote API as
/// the `context_filter` request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFilter {
    pub chain_ids: Vec<String>,
    pub contract_addresses: Vec<String>,
}

impl ContextFilter {
    /// Filter pinned to a single contract on a single chain.
    pub fn for_contract(address: impl Into<String>, chain_id: impl Into<String>) -> Self {
        Self {
            chain_ids: vec![chain_id.into()],
            contract_addresses: vec![address.into()],
        }
    }
}
