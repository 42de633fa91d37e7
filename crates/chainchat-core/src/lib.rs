//! Business logic and repository trait definitions for chainchat.
//!
//! This crate defines the "ports" (repository and remote-API traits) that the
//! infrastructure layer implements, and the services that orchestrate them:
//! session reconciliation, exchange persistence, and conversation lifecycle.
//! It depends only on `chainchat-types` -- never on `chainchat-infra` or any
//! database/HTTP crate.

pub mod exchange;
pub mod lifecycle;
pub mod remote;
pub mod repository;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
