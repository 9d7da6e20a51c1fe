use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, oauth};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/verify-email", post(auth::verify_email))
        .route("/resend-verification", post(auth::resend_verification))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/refresh", post(auth::refresh))
        .route("/google", get(oauth::google_start))
        .route("/google/callback", get(oauth::google_callback))
}
