//! Repository for the `chat_messages` table.

use dosewise_core::types::UserId;
use sqlx::PgPool;

use crate::models::chat::ChatMessage;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, sender, message, context, created_at";

/// Stores the advisor chat transcript.
pub struct ChatRepo;

impl ChatRepo {
    /// Append a message to a user's transcript.
    pub async fn insert(
        pool: &PgPool,
        user_id: UserId,
        sender: &str,
        message: &str,
        context: Option<&serde_json::Value>,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (user_id, sender, message, context)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_id)
            .bind(sender)
            .bind(message)
            .bind(context)
            .fetch_one(pool)
            .await
    }

    /// Fetch the most recent `limit` messages in chronological order.
    pub async fn history(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM (
                SELECT {COLUMNS} FROM chat_messages
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
             ) recent ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a user's entire transcript. Returns the count of deleted rows.
    pub async fn clear(pool: &PgPool, user_id: UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
