use axum::routing::get;
use axum::Router;

use crate::handlers::supplements;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(supplements::list).post(supplements::create))
        .route(
            "/{id}",
            get(supplements::get)
                .put(supplements::update)
                .delete(supplements::delete),
        )
}
