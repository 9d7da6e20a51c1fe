//! Bearer-credential extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dosewise_core::error::CoreError;
use dosewise_db::models::token::TokenPurpose;
use dosewise_db::models::user::User;
use dosewise_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, TokenKind};
use crate::auth::tokens;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer access credential in the
/// `Authorization` header.
///
/// Requests from users whose email is not yet verified are rejected with
/// 401; as a courtesy, a fresh verification email is sent first (unless a
/// live verification token already exists, to avoid flooding).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let user_id = validate_token(token, TokenKind::Access, &state.config.jwt)
            .map_err(AppError::Core)?;

        let user = UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User not found".into())))?;

        if !user.email_verified {
            auto_resend_verification(state, &user).await;
            return Err(AppError::Core(CoreError::Unauthorized(
                "Email not verified. A new verification email has been sent to your inbox."
                    .into(),
            )));
        }

        Ok(AuthUser { user })
    }
}

/// Best-effort verification resend for an unverified user hitting an
/// authenticated endpoint. Skipped when a live token already exists;
/// failures are logged and never surfaced to the caller.
async fn auto_resend_verification(state: &AppState, user: &User) {
    match tokens::has_live_token(&state.pool, &user.email, TokenPurpose::EmailVerification).await {
        Ok(true) => {
            tracing::debug!(email = %user.email, "Live verification token exists, not resending");
            return;
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!(email = %user.email, error = %e, "Resend guard check failed");
            return;
        }
    }

    let token = tokens::generate_token();
    if let Err(e) = tokens::store_and_invalidate_previous(
        &state.pool,
        &user.email,
        TokenPurpose::EmailVerification,
        &token,
    )
    .await
    {
        tracing::error!(email = %user.email, error = %e, "Failed to store verification token");
        return;
    }

    let result = state
        .mailer
        .send_verification_email(&user.email, &user.name, &token)
        .await;
    if result.success {
        tracing::info!(email = %user.email, "Auto-resent verification email");
    } else {
        tracing::error!(email = %user.email, message = %result.message, "Auto-resend failed");
    }
}
