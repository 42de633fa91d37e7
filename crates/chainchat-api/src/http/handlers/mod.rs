//! HTTP request handlers for the REST API.

pub mod chat;
pub mod contract;
pub mod conversation;
pub mod messages;
