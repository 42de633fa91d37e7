//! Persistence abstractions for chainchat.
//!
//! The traits here are implemented by the infrastructure layer
//! (e.g. `SqliteConversationRepository`). Uses native async fn in traits
//! (RPITIT, Rust 2024 edition).

pub mod conversation;
pub mod message;

pub use conversation::ConversationRepository;
pub use message::MessageRepository;
