//! Repository for the `dose_logs` table.

use dosewise_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::dose_log::{CreateDoseLog, DoseLog, UpdateDoseLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, supplement_id, scheduled_time, status, taken_at, \
                        notes, created_at, updated_at";

/// Provides CRUD operations for adherence logs.
pub struct DoseLogRepo;

impl DoseLogRepo {
    /// Insert a new dose log entry for a user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateDoseLog,
    ) -> Result<DoseLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO dose_logs (user_id, supplement_id, scheduled_time, status, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DoseLog>(&query)
            .bind(user_id)
            .bind(input.supplement_id)
            .bind(&input.scheduled_time)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a dose log by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DoseLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dose_logs WHERE id = $1");
        sqlx::query_as::<_, DoseLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's dose logs, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: UserId) -> Result<Vec<DoseLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dose_logs WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, DoseLog>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a dose log's outcome. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDoseLog,
    ) -> Result<Option<DoseLog>, sqlx::Error> {
        let query = format!(
            "UPDATE dose_logs SET
                status = COALESCE($2, status),
                taken_at = COALESCE($3, taken_at),
                notes = COALESCE($4, notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DoseLog>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(input.taken_at)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }
}
