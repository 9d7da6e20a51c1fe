//! Single-use token ledger model.

use dosewise_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `verification_tokens` ledger.
///
/// A token is *live* when it is both unused and unexpired. At most one
/// live token exists per `(email, token_type)` pair.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationToken {
    pub id: DbId,
    pub email: String,
    pub token: String,
    pub token_type: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl VerificationToken {
    /// Whether this token's expiry has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// The purpose a ledger token was issued for. Determines its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    /// The `token_type` column value.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }

    /// Fixed lifetime assigned at creation: 24 h for verification,
    /// 1 h for password reset.
    pub fn lifetime(self) -> chrono::Duration {
        match self {
            TokenPurpose::EmailVerification => chrono::Duration::hours(24),
            TokenPurpose::PasswordReset => chrono::Duration::hours(1),
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
