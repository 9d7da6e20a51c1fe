//! HTTP-level integration tests for the account lifecycle: signup, email
//! verification, login, password reset, and session refresh.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json, EmailKind, Mailbox};
use sqlx::PgPool;

const PASSWORD: &str = "hunter2-secure";

/// Sign a user up through the API and return the response JSON.
async fn signup(app: axum::Router, email: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "email": email,
        "password": PASSWORD,
        "name": "Test User",
        "age": 33,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Pull the most recent token sent to `email` out of the test mailbox.
fn last_token(mailbox: &Mailbox, email: &str, kind: EmailKind) -> String {
    mailbox
        .lock()
        .unwrap()
        .iter()
        .rev()
        .find(|m| m.to == email && m.kind == kind)
        .map(|m| m.token.clone())
        .expect("expected an email in the mailbox")
}

/// Verify a user's email through the API using the mailed token.
async fn verify(app: axum::Router, mailbox: &Mailbox, email: &str) {
    let token = last_token(mailbox, email, EmailKind::Verification);
    let response = post_json(
        app,
        "/api/v1/auth/verify-email",
        serde_json::json!({ "email": email, "token": token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Signup and verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_returns_session_and_sends_verification(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);

    let json = signup(app, "new@example.com").await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["email"], "new@example.com");
    assert_eq!(json["user"]["email_verified"], false);
    assert_eq!(json["email_sent"], true);

    let token = last_token(&mailbox, "new@example.com", EmailKind::Verification);
    assert_eq!(token.len(), 64, "opaque tokens are 64-char hex digests");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_duplicate_email(pool: PgPool) {
    let (app, _mailbox) = common::build_test_app(pool);
    signup(app.clone(), "dup@example.com").await;

    let body = serde_json::json!({
        "email": "dup@example.com",
        "password": PASSWORD,
        "name": "Again",
        "age": 40,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_short_password(pool: PgPool) {
    let (app, _mailbox) = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "short@example.com",
        "password": "abc",
        "name": "Short",
        "age": 30,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verify_email_consumes_token_exactly_once(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    signup(app.clone(), "verifyme@example.com").await;

    let token = last_token(&mailbox, "verifyme@example.com", EmailKind::Verification);
    let body = serde_json::json!({ "email": "verifyme@example.com", "token": token });

    let first = post_json(app.clone(), "/api/v1/auth/verify-email", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Replaying the consumed token is rejected with the same generic error
    // an unknown token gets.
    let second = post_json(app.clone(), "/api/v1/auth/verify-email", body).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let garbage = post_json(
        app,
        "/api/v1/auth/verify-email",
        serde_json::json!({ "email": "verifyme@example.com", "token": "0".repeat(64) }),
    )
    .await;
    assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unverified_user_is_rejected_on_protected_routes(pool: PgPool) {
    let (app, _mailbox) = common::build_test_app(pool);
    let json = signup(app.clone(), "pending@example.com").await;
    let access = json["access_token"].as_str().unwrap().to_string();

    let response = get_auth(app.clone(), "/api/v1/user/profile", &access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resend_verification_is_guarded_by_live_token(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    signup(app.clone(), "resend@example.com").await;

    // A live token from signup exists, so no new email goes out.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/resend-verification",
        serde_json::json!({ "email": "resend@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email_sent"], false);
    assert_eq!(mailbox.lock().unwrap().len(), 1);

    // Unknown email is a 404 here (authenticated-adjacent, not a probe
    // surface like forgot-password).
    let response = post_json(
        app.clone(),
        "/api/v1/auth/resend-verification",
        serde_json::json!({ "email": "ghost@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Already-verified users get a 400.
    verify(app.clone(), &mailbox, "resend@example.com").await;
    let response = post_json(
        app,
        "/api/v1/auth/resend-verification",
        serde_json::json!({ "email": "resend@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_succeeds_with_correct_credentials(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    signup(app.clone(), "login@example.com").await;
    verify(app.clone(), &mailbox, "login@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "login@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["email_verified"], true);
}

/// Unknown email and wrong password must be indistinguishable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn login_failures_do_not_reveal_which_check_failed(pool: PgPool) {
    let (app, _mailbox) = common::build_test_app(pool);
    signup(app.clone(), "known@example.com").await;

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "known@example.com", "password": "incorrect" }),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@example.com", "password": "incorrect" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b, "both failures must produce identical bodies");
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// The forgot-password response must not reveal whether the email exists.
#[sqlx::test(migrations = "../../db/migrations")]
async fn forgot_password_is_enumeration_resistant(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    signup(app.clone(), "real@example.com").await;
    mailbox.lock().unwrap().clear();

    let known = post_json(
        app.clone(),
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": "real@example.com" }),
    )
    .await;
    let unknown = post_json(
        app,
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": "ghost@example.com" }),
    )
    .await;

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);
    let a = body_json(known).await;
    let b = body_json(unknown).await;
    assert_eq!(a, b, "responses must be identical for known and unknown emails");

    // Only the real account actually received an email.
    let sent = mailbox.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "real@example.com");
    assert_eq!(sent[0].kind, EmailKind::PasswordReset);
}

/// Requesting a second reset invalidates the first token: only the most
/// recently issued token is redeemable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn reissue_invalidates_previous_reset_token(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    signup(app.clone(), "reissue@example.com").await;

    let request = serde_json::json!({ "email": "reissue@example.com" });
    post_json(app.clone(), "/api/v1/auth/forgot-password", request.clone()).await;
    let first_token = last_token(&mailbox, "reissue@example.com", EmailKind::PasswordReset);

    post_json(app.clone(), "/api/v1/auth/forgot-password", request).await;
    let second_token = last_token(&mailbox, "reissue@example.com", EmailKind::PasswordReset);
    assert_ne!(first_token, second_token);

    // The superseded token is dead.
    let stale = post_json(
        app.clone(),
        "/api/v1/auth/reset-password",
        serde_json::json!({
            "email": "reissue@example.com",
            "token": first_token,
            "new_password": "brand-new-password",
        }),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::BAD_REQUEST);

    // The replacement works.
    let fresh = post_json(
        app,
        "/api/v1/auth/reset-password",
        serde_json::json!({
            "email": "reissue@example.com",
            "token": second_token,
            "new_password": "brand-new-password",
        }),
    )
    .await;
    assert_eq!(fresh.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_password_changes_the_credential(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    signup(app.clone(), "rotate@example.com").await;
    verify(app.clone(), &mailbox, "rotate@example.com").await;

    post_json(
        app.clone(),
        "/api/v1/auth/forgot-password",
        serde_json::json!({ "email": "rotate@example.com" }),
    )
    .await;
    let token = last_token(&mailbox, "rotate@example.com", EmailKind::PasswordReset);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/reset-password",
        serde_json::json!({
            "email": "rotate@example.com",
            "token": token,
            "new_password": "rotated-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works; new one does.
    let old = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "rotate@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "rotate@example.com", "password": "rotated-password" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Session refresh and credential-kind separation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_mints_a_usable_access_token(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    let json = signup(app.clone(), "refresh@example.com").await;
    verify(app.clone(), &mailbox, "refresh@example.com").await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_auth(app.clone(), "/api/v1/auth/refresh", &refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    assert_eq!(json["token_type"], "bearer");

    let profile = get_auth(app, "/api/v1/user/profile", &access).await;
    assert_eq!(profile.status(), StatusCode::OK);
}

/// An access token must not be accepted where a refresh token is
/// required, and vice versa.
#[sqlx::test(migrations = "../../db/migrations")]
async fn credential_kinds_are_not_interchangeable(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    let json = signup(app.clone(), "kinds@example.com").await;
    verify(app.clone(), &mailbox, "kinds@example.com").await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_auth(app.clone(), "/api/v1/auth/refresh", &access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/user/profile", &refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tampered_token_is_rejected(pool: PgPool) {
    let (app, mailbox) = common::build_test_app(pool);
    let json = signup(app.clone(), "tamper@example.com").await;
    verify(app.clone(), &mailbox, "tamper@example.com").await;

    let mut access = json["access_token"].as_str().unwrap().to_string();
    // Flip a character in the signature segment.
    let flipped = if access.ends_with('a') { 'b' } else { 'a' };
    access.pop();
    access.push(flipped);

    let response = get_auth(app, "/api/v1/user/profile", &access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
