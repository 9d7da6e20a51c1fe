//! Account lifecycle handlers: signup, login, email verification,
//! password reset, and session refresh.
//!
//! Credential failures are deliberately coarse. Login reports the same
//! message whether the email is unknown or the password is wrong, and the
//! forgot-password endpoint answers identically for known and unknown
//! emails, so neither can be used to enumerate accounts.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use dosewise_core::error::CoreError;
use dosewise_db::models::token::TokenPurpose;
use dosewise_db::models::user::{CreateUser, UserResponse};
use dosewise_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, validate_token, TokenKind};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    pub age: i32,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Session credential pair plus the authenticated user.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

/// Signup response: a session plus email delivery status.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub email_sent: bool,
    pub email_message: String,
}

fn validation_error(e: validator::ValidationErrors) -> AppError {
    AppError::Core(CoreError::Validation(e.to_string()))
}

fn issue_session(
    state: &AppState,
    user: dosewise_db::models::user::User,
) -> Result<SessionResponse, AppError> {
    let access_token = generate_access_token(user.id, &state.config.jwt)?;
    let refresh_token = generate_refresh_token(user.id, &state.config.jwt)?;
    Ok(SessionResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
        user: user.into(),
    })
}

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    payload.validate().map_err(validation_error)?;

    if UserRepo::find_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(
            "Email already registered".to_string(),
        )));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: payload.email.clone(),
            password_hash,
            name: payload.name.clone(),
            age: payload.age,
            avatar_url: payload.avatar_url.clone(),
            email_verified: false,
        },
    )
    .await?;

    let token = tokens::generate_token();
    tokens::store_and_invalidate_previous(
        &state.pool,
        &user.email,
        TokenPurpose::EmailVerification,
        &token,
    )
    .await?;

    let delivery = state
        .mailer
        .send_verification_email(&user.email, &user.name, &token)
        .await;

    tracing::info!(email = %user.email, email_sent = delivery.success, "User signed up");

    let session = issue_session(&state, user)?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            session,
            email_sent: delivery.success,
            email_message: delivery.message,
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate().map_err(validation_error)?;

    // Same rejection for unknown email and wrong password.
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".to_string()));

    let user = UserRepo::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(invalid)?;

    let matches = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !matches {
        return Err(invalid());
    }

    tracing::info!(email = %user.email, "User logged in");
    Ok(Json(issue_session(&state, user)?))
}

/// POST /auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let consumed = tokens::verify_and_consume(
        &state.pool,
        &payload.email,
        &payload.token,
        TokenPurpose::EmailVerification,
    )
    .await?;

    if !consumed {
        return Err(AppError::BadRequest(
            "Invalid or expired verification token".to_string(),
        ));
    }

    UserRepo::mark_email_verified(&state.pool, &payload.email).await?;
    tracing::info!(email = %payload.email, "Email verified");

    Ok(Json(json!({
        "message": "Email verified successfully"
    })))
}

/// POST /auth/resend-verification
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate().map_err(validation_error)?;

    let user = UserRepo::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "user",
            id: payload.email.clone(),
        }))?;

    if user.email_verified {
        return Err(AppError::BadRequest("Email is already verified".to_string()));
    }

    if tokens::has_live_token(&state.pool, &user.email, TokenPurpose::EmailVerification).await? {
        return Ok(Json(json!({
            "message": "A verification email was sent recently. Please check your inbox.",
            "email_sent": false
        })));
    }

    let token = tokens::generate_token();
    tokens::store_and_invalidate_previous(
        &state.pool,
        &user.email,
        TokenPurpose::EmailVerification,
        &token,
    )
    .await?;

    let delivery = state
        .mailer
        .send_verification_email(&user.email, &user.name, &token)
        .await;

    Ok(Json(json!({
        "message": delivery.message,
        "email_sent": delivery.success
    })))
}

/// POST /auth/forgot-password
///
/// Always answers with the same success-shaped body; whether the email
/// exists is not observable from the response.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate().map_err(validation_error)?;

    if let Some(user) = UserRepo::find_by_email(&state.pool, &payload.email).await? {
        let token = tokens::generate_token();
        tokens::store_and_invalidate_previous(
            &state.pool,
            &user.email,
            TokenPurpose::PasswordReset,
            &token,
        )
        .await?;

        let delivery = state
            .mailer
            .send_password_reset_email(&user.email, &user.name, &token)
            .await;
        tracing::info!(email = %user.email, email_sent = delivery.success, "Password reset requested");
    } else {
        tracing::info!(email = %payload.email, "Password reset requested for unknown email");
    }

    Ok(Json(json!({
        "message": "If an account exists for that email, a password reset link has been sent."
    })))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate().map_err(validation_error)?;

    let consumed = tokens::verify_and_consume(
        &state.pool,
        &payload.email,
        &payload.token,
        TokenPurpose::PasswordReset,
    )
    .await?;

    if !consumed {
        return Err(AppError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    let user = UserRepo::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    let password_hash = hash_password(&payload.new_password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(email = %user.email, "Password reset completed");
    Ok(Json(json!({
        "message": "Password has been reset successfully"
    })))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /auth/refresh
///
/// Accepts a refresh credential in the `Authorization` header and mints a
/// new access credential. The refresh credential itself is not rotated.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".to_string(),
            ))
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".to_string(),
        ))
    })?;

    let user_id =
        validate_token(token, TokenKind::Refresh, &state.config.jwt).map_err(AppError::Core)?;

    // The subject must still exist; a deleted account cannot refresh.
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User not found".to_string())))?;

    let access_token = generate_access_token(user_id, &state.config.jwt)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "bearer",
    }))
}
