//! Configuration types for chainchat.
//!
//! Loaded from `config.toml` in the data directory; every field has a default
//! so a missing or partial file still yields a working configuration. The
//! remote secret key is NOT part of this file -- it comes from the
//! `NEBULA_SECRET_KEY` environment variable and never touches disk.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    pub server: ServerConfig,
    pub remote: RemoteConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Remote chat service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the hosted chat API.
    pub base_url: String,
    /// Title used when creating a session without an explicit one.
    pub default_session_title: String,
    /// Whole-request timeout for remote calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nebula-api.thirdweb.com".to_string(),
            default_session_title: "Smart Contract Explorer".to_string(),
            request_timeout_secs: 60,
        }
    }
}
