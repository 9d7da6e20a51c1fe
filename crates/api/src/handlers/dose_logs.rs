//! Adherence log handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveTime;
use dosewise_core::error::CoreError;
use dosewise_core::types::{DbId, Timestamp};
use dosewise_db::models::dose_log::{CreateDoseLog, DoseLog, UpdateDoseLog};
use dosewise_db::repositories::{DoseLogRepo, SupplementRepo};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::response::DataResponse;
use crate::state::AppState;

/// Accepted dose outcome states.
const VALID_STATUSES: &[&str] = &["pending", "taken", "missed", "skipped"];

#[derive(Debug, Deserialize)]
pub struct CreateDoseLogRequest {
    pub supplement_id: DbId,
    /// Time of day in `HH:MM`.
    pub scheduled_time: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub notes: Option<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateDoseLogRequest {
    pub status: Option<String>,
    pub taken_at: Option<Timestamp>,
    pub notes: Option<String>,
}

fn check_status(status: &str) -> Result<(), AppError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid status '{status}'. Expected one of: pending, taken, missed, skipped"
        ))))
    }
}

fn check_scheduled_time(value: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid scheduled_time '{value}'. Expected HH:MM"
        )))
    })?;
    Ok(())
}

/// GET /dose-logs
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<DoseLog>>>, AppError> {
    let logs = DoseLogRepo::list_for_user(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse::new(logs)))
}

/// POST /dose-logs
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateDoseLogRequest>,
) -> Result<(StatusCode, Json<DataResponse<DoseLog>>), AppError> {
    check_status(&payload.status)?;
    check_scheduled_time(&payload.scheduled_time)?;

    // The referenced supplement must exist and belong to the caller.
    let supplement = SupplementRepo::find_by_id(&state.pool, payload.supplement_id).await?;
    match supplement {
        Some(s) if s.user_id == auth.user.id => {}
        _ => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "supplement",
                id: payload.supplement_id.to_string(),
            }))
        }
    }

    let log = DoseLogRepo::create(
        &state.pool,
        auth.user.id,
        &CreateDoseLog {
            supplement_id: payload.supplement_id,
            scheduled_time: payload.scheduled_time,
            status: payload.status,
            notes: payload.notes,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(log))))
}

/// PATCH /dose-logs/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(payload): Json<UpdateDoseLogRequest>,
) -> Result<Json<DataResponse<DoseLog>>, AppError> {
    if let Some(status) = &payload.status {
        check_status(status)?;
    }

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "dose log",
            id: id.to_string(),
        })
    };

    let existing = DoseLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    if existing.user_id != auth.user.id {
        return Err(not_found());
    }

    let updated = DoseLogRepo::update(
        &state.pool,
        id,
        &UpdateDoseLog {
            status: payload.status,
            taken_at: payload.taken_at,
            notes: payload.notes,
        },
    )
    .await?
    .ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(updated)))
}
