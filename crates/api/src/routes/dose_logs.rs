use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::dose_logs;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dose_logs::list).post(dose_logs::create))
        .route("/{id}", patch(dose_logs::update))
}
