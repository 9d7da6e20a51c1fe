//! Repository for the `users` table.

use dosewise_core::types::UserId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, name, age, avatar_url, \
                        email_verified, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with a freshly assigned UUID, returning the row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, name, age, avatar_url, email_verified)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(UserId::new_v4())
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.avatar_url)
            .bind(input.email_verified)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: UserId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: UserId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip `email_verified` from false to true for the given email.
    ///
    /// The guard on the current value makes this the only path that can
    /// change the flag, and only in the forward direction. Returns `true`
    /// if a row transitioned.
    pub async fn mark_email_verified(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET email_verified = true, updated_at = NOW()
             WHERE email = $1 AND email_verified = false",
        )
        .bind(email)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the avatar only when none is stored yet. Returns `true` if the
    /// row was updated.
    ///
    /// Used by OAuth reconciliation, which must never overwrite an avatar
    /// the user already has.
    pub async fn set_avatar_if_absent(
        pool: &PgPool,
        id: UserId,
        avatar_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET avatar_url = $2, updated_at = NOW()
             WHERE id = $1 AND avatar_url IS NULL",
        )
        .bind(id)
        .bind(avatar_url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
