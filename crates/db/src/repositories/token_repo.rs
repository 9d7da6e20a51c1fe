//! Repository for the `verification_tokens` ledger.
//!
//! Mutation methods accept any [`sqlx::PgExecutor`] so the service layer
//! can run invalidate-then-insert inside a single transaction.

use dosewise_core::types::{DbId, Timestamp};

use crate::models::token::{TokenPurpose, VerificationToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, token, token_type, expires_at, used, used_at, created_at";

/// Ledger operations for single-use verification and reset tokens.
pub struct TokenRepo;

impl TokenRepo {
    /// Insert a new ledger row, returning it.
    pub async fn insert(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
        purpose: TokenPurpose,
        token: &str,
        expires_at: Timestamp,
    ) -> Result<VerificationToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO verification_tokens (email, token, token_type, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationToken>(&query)
            .bind(email)
            .bind(token)
            .bind(purpose.as_str())
            .bind(expires_at)
            .fetch_one(executor)
            .await
    }

    /// Mark every unused token for `(email, purpose)` as used.
    ///
    /// Returns the number of tokens invalidated. Run in the same
    /// transaction as [`TokenRepo::insert`] so the single-live-token
    /// invariant holds even when the insert fails.
    pub async fn invalidate_live(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
        purpose: TokenPurpose,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE verification_tokens SET used = true, used_at = NOW()
             WHERE email = $1 AND token_type = $2 AND used = false",
        )
        .bind(email)
        .bind(purpose.as_str())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find an unused ledger row matching `(email, token, purpose)`.
    ///
    /// Expiry is NOT checked here; the service inspects it so an expired
    /// token can be reported distinctly in logs.
    pub async fn find_unused(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM verification_tokens
             WHERE email = $1 AND token = $2 AND token_type = $3 AND used = false"
        );
        sqlx::query_as::<_, VerificationToken>(&query)
            .bind(email)
            .bind(token)
            .bind(purpose.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Atomically consume a token: set `used = true` only if it is still
    /// unused. Returns `true` iff this caller won the transition.
    ///
    /// The `used = false` predicate is the compare-and-set guard that
    /// keeps two concurrent consumers from both succeeding.
    pub async fn consume(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE verification_tokens SET used = true, used_at = NOW()
             WHERE id = $1 AND used = false",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a live (unused, unexpired) token exists for `(email, purpose)`.
    pub async fn has_live(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
        purpose: TokenPurpose,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM verification_tokens
             WHERE email = $1 AND token_type = $2 AND used = false AND expires_at > NOW()
             LIMIT 1",
        )
        .bind(email)
        .bind(purpose.as_str())
        .fetch_optional(executor)
        .await?;
        Ok(row.is_some())
    }

    /// Delete every row past its expiry. Returns the count of deleted rows.
    ///
    /// Maintenance operation; never called on the request path.
    pub async fn delete_expired(executor: impl sqlx::PgExecutor<'_>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < NOW()")
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
