//! Integration tests for the single-use token ledger.
//!
//! Runs against a real Postgres database via `#[sqlx::test]`, which
//! provisions an isolated database per test and applies the migrations.

use chrono::{Duration, Utc};
use dosewise_db::models::token::TokenPurpose;
use dosewise_db::repositories::{OauthStateRepo, TokenRepo};
use sqlx::PgPool;

const EMAIL: &str = "ledger@example.com";

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_and_find_unused(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(24);
    let row = TokenRepo::insert(&pool, EMAIL, TokenPurpose::EmailVerification, "tok-a", expires)
        .await
        .expect("insert");
    assert!(!row.used);
    assert!(row.used_at.is_none());

    let found = TokenRepo::find_unused(&pool, EMAIL, "tok-a", TokenPurpose::EmailVerification)
        .await
        .expect("find");
    assert_eq!(found.expect("row present").id, row.id);

    // Wrong purpose does not match.
    let other = TokenRepo::find_unused(&pool, EMAIL, "tok-a", TokenPurpose::PasswordReset)
        .await
        .expect("find");
    assert!(other.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalidate_live_marks_all_predecessors(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(24);
    for token in ["t1", "t2", "t3"] {
        TokenRepo::insert(&pool, EMAIL, TokenPurpose::EmailVerification, token, expires)
            .await
            .expect("insert");
    }

    let invalidated = TokenRepo::invalidate_live(&pool, EMAIL, TokenPurpose::EmailVerification)
        .await
        .expect("invalidate");
    assert_eq!(invalidated, 3);

    for token in ["t1", "t2", "t3"] {
        let found =
            TokenRepo::find_unused(&pool, EMAIL, token, TokenPurpose::EmailVerification)
                .await
                .expect("find");
        assert!(found.is_none(), "{token} should no longer be live");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalidate_scoped_to_purpose_and_email(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(1);
    TokenRepo::insert(&pool, EMAIL, TokenPurpose::EmailVerification, "verify", expires)
        .await
        .expect("insert");
    TokenRepo::insert(&pool, EMAIL, TokenPurpose::PasswordReset, "reset", expires)
        .await
        .expect("insert");
    TokenRepo::insert(
        &pool,
        "other@example.com",
        TokenPurpose::EmailVerification,
        "other",
        expires,
    )
    .await
    .expect("insert");

    TokenRepo::invalidate_live(&pool, EMAIL, TokenPurpose::EmailVerification)
        .await
        .expect("invalidate");

    // The reset token and the other user's token stay live.
    assert!(
        TokenRepo::find_unused(&pool, EMAIL, "reset", TokenPurpose::PasswordReset)
            .await
            .expect("find")
            .is_some()
    );
    assert!(TokenRepo::find_unused(
        &pool,
        "other@example.com",
        "other",
        TokenPurpose::EmailVerification
    )
    .await
    .expect("find")
    .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_consume_succeeds_exactly_once(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(24);
    let row = TokenRepo::insert(&pool, EMAIL, TokenPurpose::EmailVerification, "race", expires)
        .await
        .expect("insert");

    let (a, b) = tokio::join!(
        TokenRepo::consume(&pool, row.id),
        TokenRepo::consume(&pool, row.id),
    );
    let a = a.expect("consume a");
    let b = b.expect("consume b");

    assert!(a ^ b, "exactly one concurrent consumer must win (a={a}, b={b})");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn consume_is_idempotent_failure_after_first_win(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(24);
    let row = TokenRepo::insert(&pool, EMAIL, TokenPurpose::PasswordReset, "once", expires)
        .await
        .expect("insert");

    assert!(TokenRepo::consume(&pool, row.id).await.expect("first"));
    assert!(!TokenRepo::consume(&pool, row.id).await.expect("second"));
    assert!(!TokenRepo::consume(&pool, row.id).await.expect("third"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn has_live_ignores_used_and_expired(pool: PgPool) {
    // Expired token.
    TokenRepo::insert(
        &pool,
        EMAIL,
        TokenPurpose::EmailVerification,
        "stale",
        Utc::now() - Duration::hours(1),
    )
    .await
    .expect("insert");

    assert!(
        !TokenRepo::has_live(&pool, EMAIL, TokenPurpose::EmailVerification)
            .await
            .expect("has_live")
    );

    // Fresh token flips it.
    let row = TokenRepo::insert(
        &pool,
        EMAIL,
        TokenPurpose::EmailVerification,
        "fresh",
        Utc::now() + Duration::hours(24),
    )
    .await
    .expect("insert");
    assert!(
        TokenRepo::has_live(&pool, EMAIL, TokenPurpose::EmailVerification)
            .await
            .expect("has_live")
    );

    // Consuming it flips it back.
    TokenRepo::consume(&pool, row.id).await.expect("consume");
    assert!(
        !TokenRepo::has_live(&pool, EMAIL, TokenPurpose::EmailVerification)
            .await
            .expect("has_live")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_expired_leaves_live_tokens(pool: PgPool) {
    TokenRepo::insert(
        &pool,
        EMAIL,
        TokenPurpose::EmailVerification,
        "old",
        Utc::now() - Duration::minutes(5),
    )
    .await
    .expect("insert");
    TokenRepo::insert(
        &pool,
        EMAIL,
        TokenPurpose::EmailVerification,
        "new",
        Utc::now() + Duration::hours(24),
    )
    .await
    .expect("insert");

    let deleted = TokenRepo::delete_expired(&pool).await.expect("sweep");
    assert_eq!(deleted, 1);

    assert!(
        TokenRepo::find_unused(&pool, EMAIL, "new", TokenPurpose::EmailVerification)
            .await
            .expect("find")
            .is_some()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oauth_state_is_single_use(pool: PgPool) {
    let expires = Utc::now() + Duration::minutes(10);
    OauthStateRepo::insert(&pool, "nonce-1", "google", expires)
        .await
        .expect("insert");

    assert!(OauthStateRepo::consume(&pool, "nonce-1", "google")
        .await
        .expect("first consume"));
    assert!(!OauthStateRepo::consume(&pool, "nonce-1", "google")
        .await
        .expect("replay"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oauth_state_rejects_expired_and_wrong_provider(pool: PgPool) {
    OauthStateRepo::insert(&pool, "stale", "google", Utc::now() - Duration::minutes(1))
        .await
        .expect("insert");
    assert!(!OauthStateRepo::consume(&pool, "stale", "google")
        .await
        .expect("expired"));

    OauthStateRepo::insert(&pool, "live", "google", Utc::now() + Duration::minutes(10))
        .await
        .expect("insert");
    assert!(!OauthStateRepo::consume(&pool, "live", "github")
        .await
        .expect("wrong provider"));
    assert!(OauthStateRepo::consume(&pool, "live", "google")
        .await
        .expect("right provider"));
}
