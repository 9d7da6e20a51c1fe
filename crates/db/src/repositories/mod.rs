//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept an executor (`&PgPool` or a transaction) as the first argument.

pub mod chat_repo;
pub mod dose_log_repo;
pub mod oauth_state_repo;
pub mod supplement_repo;
pub mod token_repo;
pub mod user_repo;

pub use chat_repo::ChatRepo;
pub use dose_log_repo::DoseLogRepo;
pub use oauth_state_repo::OauthStateRepo;
pub use supplement_repo::SupplementRepo;
pub use token_repo::TokenRepo;
pub use user_repo::UserRepo;
