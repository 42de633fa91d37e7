//! Shared domain types for chainchat.
//!
//! This crate contains the core domain types used across the chainchat
//! backend: Conversation, Message, the remote-API context filter, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chain;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod remote;
