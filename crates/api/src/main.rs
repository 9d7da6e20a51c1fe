use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dosewise_api::advisor::{AdvisorConfig, DisabledAdvisor, HttpAdvisor};
use dosewise_api::config::ServerConfig;
use dosewise_api::mailer::{DisabledMailer, SmtpConfig, SmtpMailer};
use dosewise_api::oauth::google::{GoogleClient, GoogleConfig};
use dosewise_api::router::build_app_router;
use dosewise_api::state::AppState;
use dosewise_api::{advisor, background, mailer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dosewise_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = dosewise_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    dosewise_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    dosewise_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let mailer: Arc<dyn mailer::Mailer> = match SmtpConfig::from_env() {
        Some(smtp) => {
            tracing::info!(host = %smtp.smtp_host, "SMTP mailer configured");
            Arc::new(SmtpMailer::new(smtp, config.frontend_url.clone()))
        }
        None => {
            tracing::warn!("SMTP not configured, email delivery disabled");
            Arc::new(DisabledMailer)
        }
    };

    let advisor: Arc<dyn advisor::Advisor> = match AdvisorConfig::from_env() {
        Some(cfg) => {
            tracing::info!(model = %cfg.model, "Advisor configured");
            Arc::new(HttpAdvisor::new(cfg))
        }
        None => {
            tracing::warn!("Advisor API key not configured, chat replies degraded");
            Arc::new(DisabledAdvisor)
        }
    };

    let google = match GoogleConfig::from_env() {
        Some(cfg) => {
            tracing::info!("Google OAuth configured");
            Some(Arc::new(GoogleClient::new(cfg)))
        }
        None => {
            tracing::warn!("Google OAuth not configured");
            None
        }
    };

    // --- App state ---
    let state = AppState::new(pool.clone(), config.clone(), mailer, advisor, google);

    // --- Background token sweep ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_cancel_clone = sweep_cancel.clone();
    let sweep_pool = pool.clone();
    let sweep_handle = tokio::spawn(async move {
        background::token_sweep::run(sweep_pool, sweep_cancel_clone).await;
    });

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .expect("Invalid HOST/PORT bind address");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Token sweep stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
