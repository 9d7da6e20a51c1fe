//! Email delivery diagnostics.

use axum::extract::State;
use axum::Json;

use crate::mailer::MailerStatus;
use crate::state::AppState;

/// GET /email/status
///
/// Reports whether outbound email is configured and which relay it
/// points at, without exposing credentials.
pub async fn status(State(state): State<AppState>) -> Json<MailerStatus> {
    Json(state.mailer.status())
}
