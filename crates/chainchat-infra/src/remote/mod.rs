//! Remote chat service adapter.
//!
//! reqwest-based implementation of the `RemoteChatApi` port from
//! `chainchat-core`, talking to the hosted blockchain-analysis chat API.

pub mod client;
mod types;

pub use client::NebulaClient;
