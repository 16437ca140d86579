mod actor_framework;
mod app_system;
mod clients;
mod config;
mod domain;
mod http;
mod product_actor;
mod product_service;
mod upload;
mod validation;

#[cfg(test)]
mod mock_framework;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::app_system::{setup_tracing, ProductSystem};
use crate::config::{CliArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ServerConfig::from_args(CliArgs::parse())?;
    info!(
        bind = %config.bind,
        status_codes = ?config.status_codes,
        enforce_ownership = config.enforce_ownership,
        "Starting product service"
    );

    let system = ProductSystem::from_config(&config)
        .await
        .context("failed to prepare the upload directory")?;
    let app = http::router(system.state(&config), config.max_body_bytes);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server stopped with an error");
    }

    // Shutdown system gracefully
    system.shutdown().await.map_err(anyhow::Error::msg)?;

    info!("Product service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c; shutting down");
        return;
    }
    info!("Shutdown signal received");
}
