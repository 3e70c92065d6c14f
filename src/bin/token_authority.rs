//! Token authority served over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use geoauth::config::{load_env, TokenAuthorityConfig};
use geoauth::telemetry::{init_tracing, shutdown_signal};
use geoauth::token::{api, SigningSecret, TokenAuthority};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let config = TokenAuthorityConfig::parse();
    init_tracing("geoauth=info,token_authority=info");

    let secret = SigningSecret::new(config.jwt_secret.as_str()).context("Invalid JWT_SECRET")?;
    let ttl = config.token_ttl();
    match ttl {
        Some(ttl) => info!(ttl_secs = ttl.as_secs(), "Tokens expire"),
        None => info!("Tokens carry no expiry"),
    }

    let app = api::router(Arc::new(TokenAuthority::new(secret, ttl)));

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!("Token authority listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
