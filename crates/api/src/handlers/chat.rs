//! Advisor chat handlers.
//!
//! Each question is answered with the caller's profile and current
//! regimen as context. Both sides of the exchange are persisted so the
//! transcript survives restarts.

use axum::extract::{Query, State};
use axum::Json;
use dosewise_core::error::CoreError;
use dosewise_db::models::chat::ChatMessage;
use dosewise_db::models::supplement::Supplement;
use dosewise_db::models::user::User;
use dosewise_db::repositories::{ChatRepo, SupplementRepo};
use serde::Deserialize;
use serde_json::json;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default transcript page size.
const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Hard cap on transcript page size.
const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Render the profile and regimen into a compact context block for the
/// advisor prompt.
fn render_context(user: &User, supplements: &[Supplement]) -> String {
    let mut out = format!("User: {} (age {})\n", user.name, user.age);
    if supplements.is_empty() {
        out.push_str("Current regimen: none recorded\n");
    } else {
        out.push_str("Current regimen:\n");
        for s in supplements {
            out.push_str(&format!(
                "- {} ({}): {} {} {}\n",
                s.name, s.brand, s.dose_quantity, s.dose_unit, s.frequency
            ));
        }
    }
    out
}

/// POST /chat
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<DataResponse<ChatMessage>>, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message must not be empty".to_string(),
        )));
    }

    let supplements = SupplementRepo::list_for_user(&state.pool, auth.user.id).await?;
    let context = render_context(&auth.user, &supplements);
    let context_json = json!({ "supplement_count": supplements.len() });

    ChatRepo::insert(
        &state.pool,
        auth.user.id,
        "user",
        message,
        Some(&context_json),
    )
    .await?;

    let reply = state.advisor.reply(&context, message).await;

    let stored =
        ChatRepo::insert(&state.pool, auth.user.id, "assistant", &reply, None).await?;

    Ok(Json(DataResponse::new(stored)))
}

/// GET /chat/history
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<DataResponse<Vec<ChatMessage>>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let messages = ChatRepo::history(&state.pool, auth.user.id, limit).await?;
    Ok(Json(DataResponse::new(messages)))
}

/// DELETE /chat/clear
pub async fn clear(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = ChatRepo::clear(&state.pool, auth.user.id).await?;
    tracing::info!(user_id = %auth.user.id, deleted, "Chat transcript cleared");
    Ok(Json(json!({ "deleted": deleted })))
}
