//! Identity store served over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use geoauth::config::{load_env, IdentityServiceConfig};
use geoauth::identity::{
    api, IdentityRepository, IdentityService, MemoryIdentityRepository, SqliteIdentityRepository,
};
use geoauth::telemetry::{init_tracing, shutdown_signal};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let config = IdentityServiceConfig::parse();
    init_tracing("geoauth=info,identity_service=info");

    let repository: Arc<dyn IdentityRepository> = if config.in_memory {
        info!("Using in-memory identity store");
        Arc::new(MemoryIdentityRepository::new())
    } else {
        Arc::new(
            SqliteIdentityRepository::new(&config.db_path)
                .context("Failed to open identity database")?,
        )
    };

    let app = api::router(IdentityService::new(repository));

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!("Identity service listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
