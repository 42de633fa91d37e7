//! Chain identifier handling.
//!
//! Web clients send `chainId` as either a JSON number or a string. The remote
//! API wants it as a string inside `context_filter.chain_ids`, so normalize at
//! the edge and carry it as text everywhere else.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A chain identifier, normalized to its string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainId(String);

impl ChainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ChainId {
    fn from(n: u64) -> Self {
        ChainId(n.to_string())
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        ChainId(s.to_string())
    }
}

impl From<String> for ChainId {
    fn from(s: String) -> Self {
        ChainId(s)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(ChainId(n.to_string())),
            Raw::Text(s) => Ok(ChainId(s)),
        }
    }
}
