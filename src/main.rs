//! Space status server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use space_core::config::AppConfig;
use space_core::config::logging::LogFormat;
use space_core::error::AppError;
use space_core::traits::clock::SystemClock;
use space_service::status::source::{self, CodetimeSource};

#[tokio::main]
async fn main() {
    let env = std::env::var("SPACE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = fmt().with_env_filter(filter).with_target(true);

    match config.logging.format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Space status server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Initialize cache ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = Arc::new(space_cache::CacheManager::new(&config.cache).await?);

    // ── Step 2: Upstream sources ─────────────────────────────────
    let client = source::build_http_client(&config.status)?;
    let sources = source::registry_from_config(&config.status, client.clone());
    let codetime = Arc::new(CodetimeSource::new(client, config.status.codetime.clone()));
    if config.status.ncm.music_u.is_empty() {
        tracing::warn!("status.ncm.music_u is not set; NetEase status requests may be rejected");
    }
    if config.status.codetime.session.is_empty() {
        tracing::warn!("status.codetime.session is not set; codetime requests will fail");
    }

    // ── Step 3: Build and start HTTP server ──────────────────────
    let shutdown = CancellationToken::new();
    let addr = config.server.bind_addr();
    let state = space_api::AppState::new(
        config,
        cache,
        sources,
        Arc::new(SystemClock),
        codetime,
        shutdown.clone(),
    );
    let app = space_api::build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Space status server listening on {addr}");

    // ── Step 4: Graceful shutdown ────────────────────────────────
    // Open streams never finish on their own; end them so connections drain.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Space status server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
