//! HTTP-facing error type and status mapping.
//!
//! Every error leaves the service as a JSON body `{"error": ..., "code":
//! ...}` with an appropriate status. Storage failures are classified but
//! never leaked verbatim: a broken token backend is a 500, not a 400, so
//! callers can distinguish "token invalid" from "service degraded".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dosewise_core::error::CoreError;
use serde_json::json;
use thiserror::Error;

/// API-level error, convertible into an HTTP response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, String, &'static str) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} not found: {id}"),
                    "NOT_FOUND",
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, msg.clone(), "VALIDATION")
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), "CONFLICT"),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, msg.clone(), "UNAUTHORIZED")
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), "FORBIDDEN"),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                        "INTERNAL",
                    )
                }
            },
            AppError::Database(e) => classify_sqlx_error(e),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "BAD_REQUEST"),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL",
                )
            }
        }
    }
}

/// Map sqlx errors onto HTTP statuses without leaking driver details.
fn classify_sqlx_error(e: &sqlx::Error) -> (StatusCode, String, &'static str) {
    match e {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            "NOT_FOUND",
        ),
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => (
            StatusCode::CONFLICT,
            "Resource already exists".to_string(),
            "CONFLICT",
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL",
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = self.status_and_body();
        let body = Json(json!({ "error": message, "code": code }));
        (status, body).into_response()
    }
}
