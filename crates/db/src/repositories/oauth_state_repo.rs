//! Repository for the `oauth_states` table.
//!
//! State nonces share the token ledger's exactly-once consumption
//! requirement and use the same conditional-update primitive.

use dosewise_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::oauth_state::OauthState;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, state, provider, expires_at, used, used_at, created_at";

/// Durable store for OAuth authorization-code state nonces.
pub struct OauthStateRepo;

impl OauthStateRepo {
    /// Store a freshly generated nonce for the given provider.
    pub async fn insert(
        pool: &PgPool,
        state: &str,
        provider: &str,
        expires_at: Timestamp,
    ) -> Result<OauthState, sqlx::Error> {
        let query = format!(
            "INSERT INTO oauth_states (state, provider, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OauthState>(&query)
            .bind(state)
            .bind(provider)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Verify and consume a nonce in one statement.
    ///
    /// The update only matches a row that belongs to `provider`, is still
    /// unused, and has not expired, so a replayed or stale nonce affects
    /// zero rows. Returns `true` iff this caller consumed it.
    pub async fn consume(
        pool: &PgPool,
        state: &str,
        provider: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE oauth_states SET used = true, used_at = NOW()
             WHERE state = $1 AND provider = $2 AND used = false AND expires_at > NOW()",
        )
        .bind(state)
        .bind(provider)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every nonce past its expiry. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM oauth_states WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
