//! Infrastructure layer for chainchat.
//!
//! Contains implementations of the ports defined in `chainchat-core`:
//! SQLite storage (conversations, messages) and the reqwest adapter for the
//! remote blockchain-analysis chat service.

pub mod config;
pub mod remote;
pub mod sqlite;
