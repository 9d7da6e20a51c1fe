//! Adherence log model and DTOs.

use dosewise_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A dose log row from the `dose_logs` table.
///
/// Records whether a scheduled dose was taken, missed, or skipped.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DoseLog {
    pub id: DbId,
    pub user_id: UserId,
    pub supplement_id: DbId,
    /// Scheduled time of day in `HH:MM` format.
    pub scheduled_time: String,
    pub status: String,
    pub taken_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a dose log entry.
#[derive(Debug)]
pub struct CreateDoseLog {
    pub supplement_id: DbId,
    pub scheduled_time: String,
    pub status: String,
    pub notes: Option<String>,
}

/// DTO for updating a dose log's outcome.
#[derive(Debug, Default)]
pub struct UpdateDoseLog {
    pub status: Option<String>,
    pub taken_at: Option<Timestamp>,
    pub notes: Option<String>,
}
