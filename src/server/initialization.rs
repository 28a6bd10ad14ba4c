// src/server/initialization.rs

//! Handles the server initialization process: state setup and socket binding.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

/// Initializes all server components before starting the main loop.
/// A bind failure is fatal and propagates out so the process exits non-zero.
pub async fn setup(config: Config) -> Result<ServerContext> {
    let (shutdown_tx, _) = broadcast::channel(1);

    let state = ServerState::new(config.clone());
    info!("Server state initialized.");

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("PyropeDB server listening on {}:{}", config.host, config.port);

    Ok(ServerContext {
        state,
        listener,
        shutdown_tx,
    })
}
