use std::net::SocketAddr;
use std::sync::Arc;

use archive_mailer::{MailConfig, ResetLinkSender, SmtpMailer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archive_api::config::{AdminSeedConfig, DatabaseConfig, ServerConfig};
use archive_api::router::build_app_router;
use archive_api::seed::{seed_default_admin, AdminSeed};
use archive_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "archive_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        app_env = ?config.app_env,
        upload_dir = %config.upload_dir.display(),
        "Loaded server configuration"
    );

    // --- Database ---
    let db_config = DatabaseConfig::from_env();
    let pool = archive_db::create_pool(
        &db_config.url,
        db_config.max_connections,
        db_config.acquire_timeout,
    )
    .await
    .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    archive_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    archive_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Default admin ---
    match seed_default_admin(&pool, &AdminSeedConfig::from_env())
        .await
        .expect("Failed to seed default admin")
    {
        AdminSeed::Created | AdminSeed::AlreadyPresent => {}
        AdminSeed::MissingPassword => tracing::warn!(
            "No users exist and ADMIN_PASSWORD is unset; create an admin with archive-admin"
        ),
    }

    // --- Upload directory ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // --- Reset link delivery ---
    let reset_sender: Option<Arc<dyn ResetLinkSender>> = match MailConfig::from_env() {
        Some(mail_config) => {
            tracing::info!(host = %mail_config.smtp_host, "SMTP delivery configured");
            Some(Arc::new(SmtpMailer::new(mail_config)))
        }
        None if config.app_env.is_development() => {
            tracing::info!("SMTP not configured; reset links are returned in responses");
            None
        }
        None => panic!("SMTP_HOST must be set when APP_ENV=production"),
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        reset_sender,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
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
