//! Shared application state threaded through handlers.

use std::sync::Arc;

use dosewise_db::DbPool;

use crate::advisor::Advisor;
use crate::config::ServerConfig;
use crate::mailer::Mailer;
use crate::oauth::google::GoogleClient;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the pool is reference-counted internally and the
/// collaborators are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Email delivery collaborator.
    pub mailer: Arc<dyn Mailer>,
    /// AI chat advisor collaborator.
    pub advisor: Arc<dyn Advisor>,
    /// Google OAuth client, when configured.
    pub google: Option<Arc<GoogleClient>>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: ServerConfig,
        mailer: Arc<dyn Mailer>,
        advisor: Arc<dyn Advisor>,
        google: Option<Arc<GoogleClient>>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            mailer,
            advisor,
            google,
        }
    }
}
