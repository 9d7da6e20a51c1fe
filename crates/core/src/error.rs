/// Domain-level error for the Dosewise backend.
///
/// Variants stay differentiated internally for logging and diagnostics;
/// the API layer deliberately collapses several of them onto coarse
/// HTTP responses so callers cannot probe which sub-check failed.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
