//! Profile handlers.

use axum::extract::State;
use axum::Json;
use dosewise_core::error::CoreError;
use dosewise_db::models::user::{UpdateUser, UserResponse};
use dosewise_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    pub age: Option<i32>,
    pub avatar_url: Option<String>,
    /// When present, replaces the password (re-hashed with Argon2id).
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// GET /user/profile
pub async fn get_profile(auth: AuthUser) -> Json<DataResponse<UserResponse>> {
    Json(DataResponse::new(auth.user.into()))
}

/// PUT /user/profile
///
/// Partial update: absent fields are left unchanged. The verification
/// flag is not updatable here under any input.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<DataResponse<UserResponse>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if let Some(password) = &payload.password {
        let hash = hash_password(password)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;
        UserRepo::update_password(&state.pool, auth.user.id, &hash).await?;
    }

    let updated = UserRepo::update(
        &state.pool,
        auth.user.id,
        &UpdateUser {
            name: payload.name,
            age: payload.age,
            avatar_url: payload.avatar_url,
        },
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::NotFound {
        entity: "user",
        id: auth.user.id.to_string(),
    }))?;

    Ok(Json(DataResponse::new(updated.into())))
}
