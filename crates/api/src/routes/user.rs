use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(profile::get_profile).put(profile::update_profile),
    )
}
