use std::sync::Arc;

use anyhow::Context;
use case_classifier::{init_logger, server, Args, Readiness, ServerConfig};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(Args::parse());
    init_logger(config.log_filter());

    info!("=== Starting case classifier ===");

    // Artifacts are loaded exactly once, before the listener accepts traffic
    let readiness = Arc::new(Readiness::load(&config.artifacts));
    info!("Health status: {}", readiness.health());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", listener.local_addr()?);

    server::serve(listener, readiness, server::shutdown_signal())
        .await
        .context("Server error")?;

    info!("=== Server stopped ===");
    Ok(())
}
