use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neomovies_api::config::ServerConfig;
use neomovies_api::router::build_app_router;
use neomovies_api::state::AppState;
use neomovies_db::DbHandle;
use neomovies_events::Dispatcher;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neomovies_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        env = %config.node_env,
        "Loaded server configuration"
    );

    // --- Database ---
    // Connected lazily on the first request that needs it; a failure is
    // cached and reported by every later request.
    let db = DbHandle::lazy(config.mongo_uri.clone(), config.mongo_db_name.clone());
    if config.mongo_uri.is_none() {
        tracing::warn!("No MongoDB URI configured, user endpoints will fail");
    }

    // --- Background jobs ---
    let dispatcher = Dispatcher::start();
    tracing::info!("Background dispatcher started");

    // --- App state ---
    let state = AppState::build(config.clone(), db, dispatcher.clone())
        .expect("Failed to build upstream clients");
    log_configured_upstreams(&state);

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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Let queued emails and reaction mirrors finish.
    dispatcher
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    tracing::info!("Background dispatcher stopped");

    tracing::info!("Graceful shutdown complete");
}

fn log_configured_upstreams(state: &AppState) {
    tracing::info!(
        tmdb = state.tmdb.is_some(),
        kinopoisk = state.kinopoisk.is_some(),
        alloha = state.alloha.is_some(),
        lumex = state.lumex.is_some(),
        vibix = state.vibix.is_some(),
        hdvb = state.hdvb.is_some(),
        google = state.google.is_some(),
        mailer = state.mailer.is_some(),
        "Upstream clients configured"
    );
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
