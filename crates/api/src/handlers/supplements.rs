//! Supplement CRUD handlers.
//!
//! Every operation is scoped to the authenticated user. A supplement
//! owned by someone else answers 404, not 403, so IDs cannot be probed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use dosewise_core::error::CoreError;
use dosewise_core::types::DbId;
use dosewise_db::models::supplement::{CreateSupplement, Supplement, UpdateSupplement};
use dosewise_db::repositories::SupplementRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplementRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Brand must not be empty"))]
    pub brand: String,
    pub dosage_form: Option<String>,
    pub dose_quantity: String,
    pub dose_unit: String,
    pub frequency: String,
    #[serde(default = "empty_object")]
    pub times_of_day: serde_json::Value,
    #[serde(default = "empty_array")]
    pub interactions: serde_json::Value,
    #[serde(default)]
    pub remind_me: bool,
    pub expiration_date: NaiveDate,
    pub quantity: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSupplementRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub dosage_form: Option<String>,
    pub dose_quantity: Option<String>,
    pub dose_unit: Option<String>,
    pub frequency: Option<String>,
    pub times_of_day: Option<serde_json::Value>,
    pub interactions: Option<serde_json::Value>,
    pub remind_me: Option<bool>,
    pub expiration_date: Option<NaiveDate>,
    pub quantity: Option<String>,
    pub image_url: Option<String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

fn empty_array() -> serde_json::Value {
    serde_json::json!([])
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "supplement",
        id: id.to_string(),
    })
}

/// Fetch a supplement and check it belongs to the caller.
async fn owned_supplement(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> Result<Supplement, AppError> {
    let supplement = SupplementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if supplement.user_id != auth.user.id {
        return Err(not_found(id));
    }
    Ok(supplement)
}

/// GET /supplements
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<Supplement>>>, AppError> {
    let supplements = SupplementRepo::list_for_user(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse::new(supplements)))
}

/// GET /supplements/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<DataResponse<Supplement>>, AppError> {
    let supplement = owned_supplement(&state, &auth, id).await?;
    Ok(Json(DataResponse::new(supplement)))
}

/// POST /supplements
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSupplementRequest>,
) -> Result<(StatusCode, Json<DataResponse<Supplement>>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let supplement = SupplementRepo::create(
        &state.pool,
        auth.user.id,
        &CreateSupplement {
            name: payload.name,
            brand: payload.brand,
            dosage_form: payload.dosage_form,
            dose_quantity: payload.dose_quantity,
            dose_unit: payload.dose_unit,
            frequency: payload.frequency,
            times_of_day: payload.times_of_day,
            interactions: payload.interactions,
            remind_me: payload.remind_me,
            expiration_date: payload.expiration_date,
            quantity: payload.quantity,
            image_url: payload.image_url,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(supplement))))
}

/// PUT /supplements/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(payload): Json<UpdateSupplementRequest>,
) -> Result<Json<DataResponse<Supplement>>, AppError> {
    owned_supplement(&state, &auth, id).await?;

    let updated = SupplementRepo::update(
        &state.pool,
        id,
        &UpdateSupplement {
            name: payload.name,
            brand: payload.brand,
            dosage_form: payload.dosage_form,
            dose_quantity: payload.dose_quantity,
            dose_unit: payload.dose_unit,
            frequency: payload.frequency,
            times_of_day: payload.times_of_day,
            interactions: payload.interactions,
            remind_me: payload.remind_me,
            expiration_date: payload.expiration_date,
            quantity: payload.quantity,
            image_url: payload.image_url,
        },
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /supplements/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    owned_supplement(&state, &auth, id).await?;
    SupplementRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
