//! Google OAuth flow handlers.
//!
//! The callback always answers with a redirect to the frontend: session
//! credentials ride in the query string on success, a short error code
//! otherwise. Browser flows cannot consume JSON error bodies mid-redirect.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::jwt::{generate_access_token, generate_refresh_token};
use crate::error::AppError;
use crate::oauth::{self, reconcile, PROVIDER_GOOGLE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/google
///
/// Issues a single-use state nonce and returns the Google consent URL.
pub async fn google_start(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let Some(google) = &state.google else {
        return Err(AppError::BadRequest(
            "Google OAuth is not configured".to_string(),
        ));
    };

    let nonce = oauth::issue_state(&state.pool, PROVIDER_GOOGLE).await?;
    let auth_url = google.consent_url(&nonce);

    Ok(Json(json!({
        "auth_url": auth_url,
        "state": nonce
    })))
}

/// GET /auth/google/callback
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let frontend = &state.config.frontend_url;

    let Some(google) = &state.google else {
        return error_redirect(frontend, "oauth_not_configured");
    };

    if let Some(err) = &query.error {
        tracing::warn!(error = %err, "Google consent screen returned an error");
        return error_redirect(frontend, "consent_denied");
    }

    let (Some(code), Some(nonce)) = (&query.code, &query.state) else {
        return error_redirect(frontend, "missing_parameters");
    };

    // Single-use: replayed or expired nonces fail here.
    match oauth::consume_state(&state.pool, nonce, PROVIDER_GOOGLE).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("OAuth state nonce rejected");
            return error_redirect(frontend, "invalid_state");
        }
        Err(e) => {
            tracing::error!(error = %e, "OAuth state lookup failed");
            return error_redirect(frontend, "server_error");
        }
    }

    let profile = match google.fetch_profile(code).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Google code exchange failed");
            return error_redirect(frontend, "exchange_failed");
        }
    };

    let user = match reconcile::reconcile_profile(&state.pool, &profile).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "OAuth reconciliation failed");
            return error_redirect(frontend, "server_error");
        }
    };

    let session = generate_access_token(user.id, &state.config.jwt).and_then(|access| {
        generate_refresh_token(user.id, &state.config.jwt).map(|refresh| (access, refresh))
    });
    match session {
        Ok((access_token, refresh_token)) => Redirect::to(&format!(
            "{frontend}/auth/login?access_token={access_token}&refresh_token={refresh_token}"
        )),
        Err(e) => {
            tracing::error!(error = %e, "Session credential generation failed");
            error_redirect(frontend, "server_error")
        }
    }
}

fn error_redirect(frontend_url: &str, code: &str) -> Redirect {
    Redirect::to(&format!("{frontend_url}/auth/login?error={code}"))
}
