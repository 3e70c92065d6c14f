//! DaData address lookup served over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use geoauth::config::{load_env, GeoProviderConfig};
use geoauth::geo::{api, AddressLookup, DadataProvider};
use geoauth::telemetry::{init_tracing, shutdown_signal};
use geoauth::transport::http_client;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let config = GeoProviderConfig::parse();
    init_tracing("geoauth=info,geo_provider=info");

    let client = http_client(Duration::from_secs(config.upstream_timeout_secs))?;
    let provider: Arc<dyn AddressLookup> = Arc::new(DadataProvider::new(
        client,
        &config.dadata_api_key,
        &config.dadata_secret_key,
        config.dadata_base_url.clone(),
    )?);

    let app = api::router(provider);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!("Geo provider listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
