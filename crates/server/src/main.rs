//! Bazaar server - REST API for products and carts plus two rendered pages.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for the product listing and cart pages
//! - Document store behind repository traits: `PostgreSQL` (one JSONB
//!   document per row) when a database URL is configured, in-memory
//!   otherwise

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_server::config::AppConfig;
use bazaar_server::routes;
use bazaar_server::state::AppState;
use bazaar_server::store::{PgStore, postgres};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Pick the store backend: Postgres when configured, in-memory otherwise
    let state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = postgres::create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            let store = PgStore::new(pool);
            store
                .ensure_schema()
                .await
                .expect("Failed to prepare database schema");

            AppState::with_postgres(config.clone(), store)
        }
        None => {
            tracing::info!("No database URL configured, using in-memory store");
            AppState::in_memory(config.clone())
        }
    };

    // Build router
    let app = routes::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("bazaar-server listening on {}", addr);

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
