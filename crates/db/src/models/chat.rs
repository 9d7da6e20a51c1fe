//! Chat message model.

use dosewise_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A chat message row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub user_id: UserId,
    /// `"user"` or `"assistant"`.
    pub sender: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub created_at: Timestamp,
}
