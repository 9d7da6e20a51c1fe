use axum::routing::get;
use axum::Router;

use crate::handlers::email;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/status", get(email::status))
}
