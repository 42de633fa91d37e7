//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `chainchat-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, reader pool for
//! SELECTs and writer pool for mutations.

use chainchat_core::repository::ConversationRepository;
use chainchat_types::conversation::{Conversation, ConversationSummary};
use chainchat_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    user_id: String,
    session_id: String,
    title: String,
    contract_address: Option<String>,
    chain_id: Option<String>,
    last_chat_time: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            session_id: row.try_get("session_id")?,
            title: row.try_get("title")?,
            contract_address: row.try_get("contract_address")?,
            chain_id: row.try_get("chain_id")?,
            last_chat_time: row.try_get("last_chat_time")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let last_chat_time = parse_datetime(&self.last_chat_time)?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Conversation {
            id,
            user_id: self.user_id,
            session_id: self.session_id,
            title: self.title,
            contract_address: self.contract_address,
            chain_id: self.chain_id,
            last_chat_time,
            created_at,
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
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO conversations (id, user_id, session_id, title, contract_address, chain_id, last_chat_time, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.to_string())
        .bind(&conversation.user_id)
        .bind(&conversation.session_id)
        .bind(&conversation.title)
        .bind(&conversation.contract_address)
        .bind(&conversation.chain_id)
        .bind(format_datetime(&conversation.last_chat_time))
        .bind(format_datetime(&conversation.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(conversation.clone()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                RepositoryError::Conflict(format!(
                    "session id '{}' already exists",
                    conversation.session_id
                )),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn find_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn find_owned(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE session_id = ? AND user_id = ?")
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT session_id, title, last_chat_time FROM conversations
               WHERE user_id = ? ORDER BY last_chat_time DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_id: String = row
                .try_get("session_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let title: String = row
                .try_get("title")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let last_chat_time: String = row
                .try_get("last_chat_time")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            summaries.push(ConversationSummary {
                session_id,
                title,
                last_chat_time: parse_datetime(&last_chat_time)?,
            });
        }

        Ok(summaries)
    }

    async fn count_for_user(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn oldest_for_user(&self, user_id: &str) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY last_chat_time ASC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn touch_activity(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        // Zero rows affected is fine: a benign race with deletion.
        sqlx::query("UPDATE conversations SET last_chat_time = ? WHERE session_id = ?")
            .bind(format_datetime(&at))
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn update_metadata(
        &self,
        session_id: &str,
        contract_address: Option<&str>,
        chain_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        // COALESCE keeps the stored value for absent fields.
        sqlx::query(
            r#"UPDATE conversations
               SET contract_address = COALESCE(?, contract_address),
                   chain_id = COALESCE(?, chain_id)
               WHERE session_id = ?"#,
        )
        .bind(contract_address)
        .bind(chain_id)
        .bind(session_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn replace_session_id(
        &self,
        old_session_id: &str,
        new_session_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET session_id = ? WHERE session_id = ?")
            .bind(new_session_id)
            .bind(old_session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
