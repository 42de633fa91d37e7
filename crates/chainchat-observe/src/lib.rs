//! Observability utilities for chainchat.

pub mod tracing_setup;
