//! Periodic cleanup of expired single-use tokens.
//!
//! Spawns a background task that deletes expired verification tokens and
//! OAuth state nonces. Expiry enforcement never depends on this job: an
//! expired token is rejected at verification time whether or not the
//! sweep has run. The sweep only keeps the tables from growing without
//! bound.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::auth::tokens;
use crate::oauth;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the token sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Token sweep job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Token sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match tokens::sweep_expired(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Token sweep: purged expired tokens");
                    }
                    Ok(_) => {
                        tracing::debug!("Token sweep: no expired tokens");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Token sweep: token cleanup failed");
                    }
                }
                match oauth::sweep_expired_states(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Token sweep: purged expired OAuth states");
                    }
                    Ok(_) => {
                        tracing::debug!("Token sweep: no expired OAuth states");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Token sweep: OAuth state cleanup failed");
                    }
                }
            }
        }
    }
}
