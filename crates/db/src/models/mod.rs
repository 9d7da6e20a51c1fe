//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update DTOs with named, typed fields (validated once at the
//!   API boundary, never re-checked ad hoc per access)

pub mod chat;
pub mod dose_log;
pub mod oauth_state;
pub mod supplement;
pub mod token;
pub mod user;
