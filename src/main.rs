//! Refill check server binary.
//!
//! Loads configuration from the environment, wires the Shopify customer
//! directory into the HTTP router and serves until Ctrl-C or SIGTERM.

use std::sync::Arc;

use refill_check::adapters::http::{build_router, RefillAppState};
use refill_check::adapters::shopify::ShopifyAdminDirectory;
use refill_check::config::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("STARTUP_ERROR {}", err);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    if let Err(err) = config.validate() {
        eprintln!("STARTUP_ERROR {}", err);
        std::process::exit(1);
    }

    let missing = config.missing_settings();
    if !missing.is_empty() {
        warn!(
            missing = ?missing,
            "Refill checks will fail until these settings are provided"
        );
    }

    let upstream_timeout = config.server.upstream_timeout();
    let directory = match ShopifyAdminDirectory::new(config.shopify.clone(), upstream_timeout) {
        Ok(directory) => directory,
        Err(err) => {
            eprintln!("STARTUP_ERROR {}", err);
            std::process::exit(1);
        }
    };

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(err) => {
            eprintln!("STARTUP_ERROR {}", err);
            std::process::exit(1);
        }
    };

    let state = RefillAppState::new(Arc::new(directory), Arc::new(config));
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("STARTUP_ERROR failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    info!(bind_addr = %addr, "refill-check listening");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("SERVER_ERROR {}", err);
        std::process::exit(1);
    }

    info!("HTTP server stopped gracefully");
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides
/// `server.log_level`.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Waits for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
