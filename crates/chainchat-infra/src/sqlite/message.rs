//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `chainchat-core` using sqlx with split
//! read/write pools. One row per utterance; the bulk UPDATE in
//! `reassign_session` is what re-points history when a remote session is
//! replaced.

use chainchat_core::repository::MessageRepository;
use chainchat_types::error::RepositoryError;
use chainchat_types::message::Message;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    user_id: String,
    session_id: String,
    user_message: Option<String>,
    bot_message: Option<String>,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            session_id: row.try_get("session_id")?,
            user_message: row.try_get("user_message")?,
            bot_message: row.try_get("bot_message")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let timestamp = parse_datetime(&self.timestamp)?;

        Ok(Message {
            id,
            user_id: self.user_id,
            session_id: self.session_id,
            user_message: self.user_message,
            bot_message: self.bot_message,
            timestamp,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// MessageRepository implementation
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO messages (id, user_id, session_id, user_message, bot_message, timestamp)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&message.user_id)
        .bind(&message.session_id)
        .bind(&message.user_message)
        .bind(&message.bot_message)
        .bind(format_datetime(&message.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows =
            sqlx::query("SELECT * FROM messages WHERE session_id = ? ORDER BY timestamp ASC")
                .bind(session_id)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn reassign_session(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE messages SET session_id = ? WHERE session_id = ?")
            .bind(new_session_id)
            .bind(old_session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete_for_session(&self, session_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list_ordered() {
        let repo = SqliteMessageRepository::new(test_pool().await);

        let base = Utc::now();
        let mut first = Message::user("u1", "s1", "hello");
        first.timestamp = base;
        let mut second = Message::bot("u1", "s1", "hi there");
        second.timestamp = base + chrono::Duration::seconds(1);

        // Insert out of order; listing must sort by timestamp.
        repo.insert(&second).await.unwrap();
        repo.insert(&first).await.unwrap();

        let messages = repo.list_for_session("s1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].user_message.as_deref(), Some("hello"));
        assert_eq!(messages[1].bot_message.as_deref(), Some("hi there"));

        // Repeated reads with no writes return the identical list.
        let again = repo.list_for_session("s1").await.unwrap();
        assert_eq!(messages, again);
    }

    #[tokio::test]
    async fn test_list_scopes_to_session() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        repo.insert(&Message::user("u1", "s1", "one")).await.unwrap();
        repo.insert(&Message::user("u1", "s2", "two")).await.unwrap();

        let messages = repo.list_for_session("s1").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user_message.as_deref(), Some("one"));
    }

    #[tokio::test]
    async fn test_reassign_session_moves_all_rows() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        repo.insert(&Message::user("u1", "old", "first")).await.unwrap();
        repo.insert(&Message::bot("u1", "old", "second")).await.unwrap();
        repo.insert(&Message::user("u1", "other", "untouched"))
            .await
            .unwrap();

        let moved = repo.reassign_session("old", "new").await.unwrap();
        assert_eq!(moved, 2);

        assert!(repo.list_for_session("old").await.unwrap().is_empty());
        assert_eq!(repo.list_for_session("new").await.unwrap().len(), 2);
        assert_eq!(repo.list_for_session("other").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_for_session() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        repo.insert(&Message::user("u1", "s1", "one")).await.unwrap();
        repo.insert(&Message::bot("u1", "s1", "two")).await.unwrap();

        let removed = repo.delete_for_session("s1").await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.list_for_session("s1").await.unwrap().is_empty());

        // Deleting an empty session removes nothing and is not an error.
        assert_eq!(repo.delete_for_session("s1").await.unwrap(), 0);
    }
}
