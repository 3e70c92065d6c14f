//! Gateway binary: the public HTTP entry point

use anyhow::{Context, Result};
use clap::Parser;
use geoauth::config::{load_env, GatewayConfig};
use geoauth::gateway::{self, GatewayState};
use geoauth::telemetry::{init_tracing, shutdown_signal};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let config = GatewayConfig::parse();
    init_tracing("geoauth=info,gateway=info");

    let mut state = GatewayState::from_config(&config)?;
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics recorder not installed: {}", e),
    }

    let app = gateway::router(state);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!("Gateway listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
