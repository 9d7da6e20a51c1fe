//! User entity model and DTOs.

use dosewise_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub age: i32,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            email: u.email,
            name: u.name,
            age: u.age,
            avatar_url: u.avatar_url,
            email_verified: u.email_verified,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// DTO for creating a new user.
///
/// `email_verified` is `false` for the password signup path and `true`
/// for users created by OAuth reconciliation.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
}

/// DTO for updating profile fields. All fields are optional.
///
/// Deliberately excludes `email_verified`: the false-to-true transition
/// goes through `UserRepo::mark_email_verified` only, so verification
/// can never be reversed by a profile update.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub avatar_url: Option<String>,
}
