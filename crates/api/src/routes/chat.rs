use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(chat::send))
        .route("/history", get(chat::history))
        .route("/clear", delete(chat::clear))
}
