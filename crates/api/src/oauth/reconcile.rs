//! Reconcile an external OAuth identity into the local user table.

use dosewise_core::error::CoreError;
use dosewise_db::models::user::{CreateUser, User};
use dosewise_db::repositories::UserRepo;
use dosewise_db::DbPool;

use crate::auth::password::hash_password;
use crate::auth::tokens::generate_token;
use crate::error::AppError;
use crate::oauth::google::GoogleProfile;

/// Age recorded for OAuth-created users until they edit their profile.
const DEFAULT_OAUTH_AGE: i32 = 25;

/// Merge a Google profile into the local user table and return the
/// resulting user.
///
/// Idempotent: running the same profile through any number of times
/// converges to the same row.
///
/// - Existing user: `email_verified` flips only from `false` to `true`
///   (never back), and the avatar is adopted only when no local avatar is
///   set. Name and password are never touched.
/// - New user: created with the profile's name and avatar, a random
///   placeholder password (the account authenticates via OAuth, but the
///   column is non-null), and a default age.
pub async fn reconcile_profile(pool: &DbPool, profile: &GoogleProfile) -> Result<User, AppError> {
    if let Some(existing) = UserRepo::find_by_email(pool, &profile.email).await? {
        if profile.verified_email && !existing.email_verified {
            UserRepo::mark_email_verified(pool, &existing.email).await?;
        }
        if let Some(picture) = &profile.picture {
            UserRepo::set_avatar_if_absent(pool, existing.id, picture).await?;
        }
        let user = UserRepo::find_by_id(pool, existing.id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Internal("User vanished during OAuth merge".into()))
            })?;
        tracing::info!(email = %user.email, "Linked OAuth sign-in to existing user");
        return Ok(user);
    }

    // Placeholder credential: unguessable, never communicated to anyone.
    let placeholder = generate_token();
    let password_hash = hash_password(&placeholder)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: profile.email.clone(),
            password_hash,
            name: profile.display_name(),
            age: DEFAULT_OAUTH_AGE,
            avatar_url: profile.picture.clone(),
            email_verified: profile.verified_email,
        },
    )
    .await?;

    tracing::info!(email = %user.email, "Created user from OAuth profile");
    Ok(user)
}
