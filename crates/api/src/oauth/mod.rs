//! Google OAuth identity bridge.
//!
//! The bridge issues single-use state nonces for CSRF protection,
//! exchanges authorization codes for profile data, and reconciles the
//! external identity into the local user table. State nonces live in the
//! database, never in process memory, so restarts and multiple instances
//! do not break in-flight flows.

pub mod google;
pub mod reconcile;

use chrono::{Duration, Utc};
use dosewise_db::repositories::OauthStateRepo;
use dosewise_db::DbPool;
use rand::RngCore;

/// How long an issued state nonce stays redeemable.
const STATE_LIFETIME_MINS: i64 = 10;

/// Provider tag stored alongside each nonce.
pub const PROVIDER_GOOGLE: &str = "google";

/// Generate and persist a fresh single-use state nonce.
pub async fn issue_state(pool: &DbPool, provider: &str) -> Result<String, sqlx::Error> {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let state: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

    let expires_at = Utc::now() + Duration::minutes(STATE_LIFETIME_MINS);
    OauthStateRepo::insert(pool, &state, provider, expires_at).await?;
    Ok(state)
}

/// Atomically redeem a state nonce. Returns `true` for exactly one caller
/// per nonce; unknown, used, or expired nonces return `false`.
pub async fn consume_state(
    pool: &DbPool,
    state: &str,
    provider: &str,
) -> Result<bool, sqlx::Error> {
    OauthStateRepo::consume(pool, state, provider).await
}

/// Delete expired state nonces. Returns the number removed.
pub async fn sweep_expired_states(pool: &DbPool) -> Result<u64, sqlx::Error> {
    OauthStateRepo::delete_expired(pool).await
}
