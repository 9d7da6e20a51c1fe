//! Repository for the `supplements` table.

use dosewise_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::supplement::{CreateSupplement, Supplement, UpdateSupplement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, brand, dosage_form, dose_quantity, dose_unit, \
                        frequency, times_of_day, interactions, remind_me, expiration_date, \
                        quantity, image_url, created_at, updated_at";

/// Provides CRUD operations for supplements.
pub struct SupplementRepo;

impl SupplementRepo {
    /// Insert a new supplement for a user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateSupplement,
    ) -> Result<Supplement, sqlx::Error> {
        let query = format!(
            "INSERT INTO supplements (user_id, name, brand, dosage_form, dose_quantity,
                dose_unit, frequency, times_of_day, interactions, remind_me,
                expiration_date, quantity, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplement>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.dosage_form)
            .bind(&input.dose_quantity)
            .bind(&input.dose_unit)
            .bind(&input.frequency)
            .bind(&input.times_of_day)
            .bind(&input.interactions)
            .bind(input.remind_me)
            .bind(input.expiration_date)
            .bind(&input.quantity)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a supplement by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Supplement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM supplements WHERE id = $1");
        sqlx::query_as::<_, Supplement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's supplements, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<Supplement>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM supplements WHERE user_id = $1 ORDER BY created_at");
        sqlx::query_as::<_, Supplement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a supplement. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSupplement,
    ) -> Result<Option<Supplement>, sqlx::Error> {
        let query = format!(
            "UPDATE supplements SET
                name = COALESCE($2, name),
                brand = COALESCE($3, brand),
                dosage_form = COALESCE($4, dosage_form),
                dose_quantity = COALESCE($5, dose_quantity),
                dose_unit = COALESCE($6, dose_unit),
                frequency = COALESCE($7, frequency),
                times_of_day = COALESCE($8, times_of_day),
                interactions = COALESCE($9, interactions),
                remind_me = COALESCE($10, remind_me),
                expiration_date = COALESCE($11, expiration_date),
                quantity = COALESCE($12, quantity),
                image_url = COALESCE($13, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplement>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.dosage_form)
            .bind(&input.dose_quantity)
            .bind(&input.dose_unit)
            .bind(&input.frequency)
            .bind(&input.times_of_day)
            .bind(&input.interactions)
            .bind(input.remind_me)
            .bind(input.expiration_date)
            .bind(&input.quantity)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a supplement. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM supplements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
