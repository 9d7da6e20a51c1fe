//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as
//! `main.rs`) on top of a `#[sqlx::test]` pool, with recording doubles
//! substituted for the email and advisor collaborators.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use dosewise_api::advisor::Advisor;
use dosewise_api::auth::jwt::JwtConfig;
use dosewise_api::config::ServerConfig;
use dosewise_api::mailer::{DeliveryResult, Mailer, MailerStatus};
use dosewise_api::router::build_app_router;
use dosewise_api::state::AppState;

/// One captured outbound email.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub token: String,
    pub kind: EmailKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Verification,
    PasswordReset,
}

/// Shared handle to everything the test mailer has "sent".
pub type Mailbox = Arc<Mutex<Vec<SentEmail>>>;

/// Mailer double that records every send and always reports success.
pub struct RecordingMailer {
    pub mailbox: Mailbox,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_email(&self, to: &str, _name: &str, token: &str) -> DeliveryResult {
        self.mailbox.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            token: token.to_string(),
            kind: EmailKind::Verification,
        });
        DeliveryResult {
            success: true,
            message: "recorded".to_string(),
            error_code: None,
        }
    }

    async fn send_password_reset_email(
        &self,
        to: &str,
        _name: &str,
        token: &str,
    ) -> DeliveryResult {
        self.mailbox.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            token: token.to_string(),
            kind: EmailKind::PasswordReset,
        });
        DeliveryResult {
            success: true,
            message: "recorded".to_string(),
            error_code: None,
        }
    }

    fn status(&self) -> MailerStatus {
        MailerStatus {
            configured: true,
            smtp_host: Some("smtp.test.local".to_string()),
            smtp_port: Some(587),
            from_address: Some("noreply@test.local".to_string()),
        }
    }
}

/// Advisor double with a fixed reply.
pub struct CannedAdvisor;

#[async_trait]
impl Advisor for CannedAdvisor {
    async fn reply(&self, _context: &str, _question: &str) -> String {
        "canned advisor reply".to_string()
    }
}

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        frontend_url: "http://localhost:3000".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 30,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router plus a handle to the recorded mailbox.
pub fn build_test_app(pool: PgPool) -> (Router, Mailbox) {
    let config = test_config();
    let mailbox: Mailbox = Arc::new(Mutex::new(Vec::new()));
    let state = AppState::new(
        pool,
        config.clone(),
        Arc::new(RecordingMailer {
            mailbox: Arc::clone(&mailbox),
        }),
        Arc::new(CannedAdvisor),
        None,
    );
    (build_app_router(state, &config), mailbox)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Consume a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
