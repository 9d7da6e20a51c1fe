//! Session credentials: HS256-signed, self-describing access and refresh
//! tokens.
//!
//! A credential embeds its subject, kind, and absolute expiry; no
//! server-side session row exists. Verification is uniform: signature
//! mismatch, tampering, expiry, and kind confusion all surface as the
//! same error so callers learn nothing about which check failed.

use dosewise_core::error::CoreError;
use dosewise_core::types::UserId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The two credential kinds. A refresh credential is never accepted
/// where access is required, and vice versa; there is no upgrade path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every session credential.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's UUID.
    pub sub: UserId,
    /// Credential kind tag (`access` or `refresh`).
    pub kind: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for session credential generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify credentials.
    pub secret: String,
    /// Access credential lifetime in minutes (default: 30).
    pub access_token_expiry_mins: i64,
    /// Refresh credential lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

/// Default access credential expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 30;
/// Default refresh credential expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `30`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

/// Generate an HS256 access credential for the given user (30 min TTL).
pub fn generate_access_token(user_id: UserId, config: &JwtConfig) -> Result<String, CoreError> {
    generate_token(
        user_id,
        TokenKind::Access,
        config.access_token_expiry_mins * 60,
        config,
    )
}

/// Generate an HS256 refresh credential for the given user (7 day TTL).
pub fn generate_refresh_token(user_id: UserId, config: &JwtConfig) -> Result<String, CoreError> {
    generate_token(
        user_id,
        TokenKind::Refresh,
        config.refresh_token_expiry_days * 86_400,
        config,
    )
}

fn generate_token(
    user_id: UserId,
    kind: TokenKind,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, CoreError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        kind,
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("Credential generation failed: {e}")))
}

/// Validate a credential and return its subject.
///
/// Checks the signature, expiry, and that the embedded kind equals
/// `expected_kind`. Every failure cause maps to the same
/// [`CoreError::Unauthorized`] value.
pub fn validate_token(
    token: &str,
    expected_kind: TokenKind,
    config: &JwtConfig,
) -> Result<UserId, CoreError> {
    let invalid = || CoreError::Unauthorized("Invalid or expired credential".into());

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map_err(|_| invalid())?;

    if token_data.claims.kind != expected_kind {
        return Err(invalid());
    }

    Ok(token_data.claims.sub)
}
