//! Asti platform API server.
//!
//! Serves the REST API for the services-ordering platform: accounts and
//! role-based admin management, the services catalog, orders with status
//! moderation, per-user notifications, news, and community suggestions.
//! All data lives in flat JSON files under the configured data directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use asti_server::config::ServerConfig;
use asti_server::state::AppState;
use asti_server::store::Database;

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter.
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "asti_server=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Open the flat-file document store
    let db = Database::open(&config.data_dir).expect("Failed to open data directory");
    tracing::info!(dir = %config.data_dir.display(), "document store opened");

    let state = AppState::new(config.clone(), db);

    // Ensure the super-admin account exists before accepting traffic
    state
        .auth()
        .seed_super_admin()
        .await
        .expect("Failed to seed super-admin account");

    let app = asti_server::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
