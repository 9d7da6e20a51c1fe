//! OAuth state-nonce model.
//!
//! Nonces are stored durably (never in process memory) so the single-use
//! guarantee holds across multiple server instances.

use dosewise_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `oauth_states` table.
#[derive(Debug, Clone, FromRow)]
pub struct OauthState {
    pub id: DbId,
    pub state: String,
    pub provider: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
