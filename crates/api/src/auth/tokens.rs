//! Single-use token service for email verification and password reset.
//!
//! Tokens are opaque 64-character hex digests of 32 cryptographically
//! random bytes. The ledger enforces two invariants:
//!
//! - at most one live token per `(email, purpose)` pair, maintained by
//!   invalidating predecessors and inserting the replacement inside one
//!   transaction;
//! - exactly-once consumption, via a conditional update guarded on the
//!   stored `used` flag ([`TokenRepo::consume`]).
//!
//! Storage failures propagate as [`sqlx::Error`]; callers must not
//! conflate "backend down" with "token invalid".

use chrono::Utc;
use dosewise_db::models::token::TokenPurpose;
use dosewise_db::repositories::TokenRepo;
use dosewise_db::DbPool;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate an unguessable single-use token.
///
/// 32 bytes (256 bits) from the thread-local CSPRNG, rendered as the
/// lowercase hex SHA-256 digest so every token is a fixed-length opaque
/// string. No ledger side effect; pair with
/// [`store_and_invalidate_previous`].
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Invalidate all live tokens for `(email, purpose)` and insert the new
/// token, as a single transaction.
///
/// Running both steps in one unit means a failed insert rolls the
/// invalidation back, so the caller's email never ends up with zero live
/// tokens after a partial failure.
pub async fn store_and_invalidate_previous(
    pool: &DbPool,
    email: &str,
    purpose: TokenPurpose,
    token: &str,
) -> Result<(), sqlx::Error> {
    let expires_at = Utc::now() + purpose.lifetime();

    let mut tx = pool.begin().await?;
    let invalidated = TokenRepo::invalidate_live(&mut *tx, email, purpose).await?;
    TokenRepo::insert(&mut *tx, email, purpose, token, expires_at).await?;
    tx.commit().await?;

    tracing::info!(email, %purpose, invalidated, "Stored new token");
    Ok(())
}

/// Verify and consume a token. Returns `true` only for the single caller
/// that transitions the row from unused to used.
///
/// An unknown or already-consumed token returns `false`. An expired
/// token also returns `false` and is left unconsumed; the periodic sweep
/// removes it.
pub async fn verify_and_consume(
    pool: &DbPool,
    email: &str,
    token: &str,
    purpose: TokenPurpose,
) -> Result<bool, sqlx::Error> {
    let Some(row) = TokenRepo::find_unused(pool, email, token, purpose).await? else {
        tracing::warn!(email, %purpose, "Token not found or already used");
        return Ok(false);
    };

    if row.is_expired(Utc::now()) {
        tracing::warn!(email, %purpose, "Token expired");
        return Ok(false);
    }

    // Conditional update: only one of any number of concurrent callers
    // observes rows_affected == 1.
    let consumed = TokenRepo::consume(pool, row.id).await?;
    if consumed {
        tracing::info!(email, %purpose, "Token verified and consumed");
    } else {
        tracing::warn!(email, %purpose, "Token was consumed by a concurrent request");
    }
    Ok(consumed)
}

/// Whether a live (unused, unexpired) token exists for `(email, purpose)`.
///
/// Used as a resend guard so repeated requests do not flood a user's
/// inbox with duplicate verification emails.
pub async fn has_live_token(
    pool: &DbPool,
    email: &str,
    purpose: TokenPurpose,
) -> Result<bool, sqlx::Error> {
    TokenRepo::has_live(pool, email, purpose).await
}

/// Delete all tokens past their expiry. Returns the number removed.
pub async fn sweep_expired(pool: &DbPool) -> Result<u64, sqlx::Error> {
    TokenRepo::delete_expired(pool).await
}
