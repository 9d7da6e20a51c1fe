//! Integration tests for the single-use token service, exercising the
//! transactional re-issue and verify-consume paths against Postgres.

use chrono::{Duration, Utc};
use dosewise_api::auth::tokens;
use dosewise_db::models::token::TokenPurpose;
use dosewise_db::repositories::TokenRepo;
use sqlx::PgPool;

const EMAIL: &str = "service@example.com";

/// Count live (unused, unexpired) rows for the address.
async fn live_count(pool: &PgPool, purpose: TokenPurpose) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM verification_tokens
         WHERE email = $1 AND token_type = $2 AND used = false AND expires_at > NOW()",
    )
    .bind(EMAIL)
    .bind(purpose.as_str())
    .fetch_one(pool)
    .await
    .expect("count")
}

/// No matter how many times a token is re-issued, at most one stays live.
#[sqlx::test(migrations = "../../db/migrations")]
async fn reissue_maintains_single_live_token(pool: PgPool) {
    for i in 0..5 {
        let token = tokens::generate_token();
        tokens::store_and_invalidate_previous(
            &pool,
            EMAIL,
            TokenPurpose::EmailVerification,
            &token,
        )
        .await
        .expect("store");
        assert_eq!(
            live_count(&pool, TokenPurpose::EmailVerification).await,
            1,
            "after issue #{i}"
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_latest_token_verifies(pool: PgPool) {
    let first = tokens::generate_token();
    tokens::store_and_invalidate_previous(&pool, EMAIL, TokenPurpose::PasswordReset, &first)
        .await
        .expect("store first");

    let second = tokens::generate_token();
    tokens::store_and_invalidate_previous(&pool, EMAIL, TokenPurpose::PasswordReset, &second)
        .await
        .expect("store second");

    assert!(
        !tokens::verify_and_consume(&pool, EMAIL, &first, TokenPurpose::PasswordReset)
            .await
            .expect("verify first"),
        "superseded token must fail"
    );
    assert!(
        tokens::verify_and_consume(&pool, EMAIL, &second, TokenPurpose::PasswordReset)
            .await
            .expect("verify second"),
        "latest token must succeed"
    );
    // And only once.
    assert!(
        !tokens::verify_and_consume(&pool, EMAIL, &second, TokenPurpose::PasswordReset)
            .await
            .expect("verify second again")
    );
}

/// An expired token fails verification and is left in place (unconsumed)
/// for the sweep to remove.
#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_token_fails_and_is_left_for_the_sweep(pool: PgPool) {
    TokenRepo::insert(
        &pool,
        EMAIL,
        TokenPurpose::EmailVerification,
        "expired-token",
        Utc::now() - Duration::minutes(1),
    )
    .await
    .expect("insert");

    assert!(!tokens::verify_and_consume(
        &pool,
        EMAIL,
        "expired-token",
        TokenPurpose::EmailVerification
    )
    .await
    .expect("verify"));

    // Still present and unconsumed until the sweep runs.
    let row = TokenRepo::find_unused(&pool, EMAIL, "expired-token", TokenPurpose::EmailVerification)
        .await
        .expect("find")
        .expect("row still present");
    assert!(!row.used);

    let swept = tokens::sweep_expired(&pool).await.expect("sweep");
    assert_eq!(swept, 1);
}

/// Purposes are independent ledgers: a verification token cannot be spent
/// as a reset token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn purposes_do_not_cross(pool: PgPool) {
    let token = tokens::generate_token();
    tokens::store_and_invalidate_previous(&pool, EMAIL, TokenPurpose::EmailVerification, &token)
        .await
        .expect("store");

    assert!(
        !tokens::verify_and_consume(&pool, EMAIL, &token, TokenPurpose::PasswordReset)
            .await
            .expect("cross purpose")
    );
    // The real purpose still works afterwards.
    assert!(
        tokens::verify_and_consume(&pool, EMAIL, &token, TokenPurpose::EmailVerification)
            .await
            .expect("right purpose")
    );
}
