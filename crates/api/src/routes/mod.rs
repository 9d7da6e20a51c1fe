//! Route table. Handlers live in [`crate::handlers`]; these modules only
//! wire paths to them.

pub mod auth;
pub mod chat;
pub mod dose_logs;
pub mod email;
pub mod health;
pub mod supplements;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// All versioned API routes, nested under `/api/v1` by the app router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/email", email::routes())
        .nest("/user", user::routes())
        .nest("/supplements", supplements::routes())
        .nest("/dose-logs", dose_logs::routes())
        .nest("/chat", chat::routes())
}
