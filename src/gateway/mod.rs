//! Authorization Gateway Module
//! Mission: Single public entry point; gate protected routes on a verified token

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod responder;

use crate::config::GatewayConfig;
use crate::geo::{AddressLookup, DadataProvider, HttpGeoClient};
use crate::identity::{
    HttpIdentityClient, IdentityClient, IdentityService, SqliteIdentityRepository,
};
use crate::middleware::request_logging;
use crate::token::{HttpTokenClient, SigningSecret, TokenAuthority, TokenClient};
use crate::transport::http_client;
use anyhow::{anyhow, Context, Result};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;

pub use middleware::{authorize, AuthContext};
pub use responder::ApiError;

/// Shared gateway state: one client per dependency
#[derive(Clone)]
pub struct GatewayState {
    pub identity: Arc<dyn IdentityClient>,
    pub tokens: Arc<dyn TokenClient>,
    pub geo: Arc<dyn AddressLookup>,
    pub metrics: Option<PrometheusHandle>,
}

impl GatewayState {
    pub fn new(
        identity: Arc<dyn IdentityClient>,
        tokens: Arc<dyn TokenClient>,
        geo: Arc<dyn AddressLookup>,
    ) -> Self {
        Self {
            identity,
            tokens,
            geo,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Build clients from config: remote when a URL is set, embedded otherwise
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let client = http_client(Duration::from_secs(config.upstream_timeout_secs))?;

        let identity: Arc<dyn IdentityClient> = match &config.identity_url {
            Some(url) => {
                info!(%url, "Identity store: remote");
                Arc::new(HttpIdentityClient::new(client.clone(), url.clone()))
            }
            None => {
                info!(path = %config.identity_db.display(), "Identity store: embedded SQLite");
                let repository = SqliteIdentityRepository::new(&config.identity_db)
                    .context("Failed to open identity database")?;
                Arc::new(IdentityService::new(Arc::new(repository)))
            }
        };

        let tokens: Arc<dyn TokenClient> = match &config.token_url {
            Some(url) => {
                info!(%url, "Token authority: remote");
                Arc::new(HttpTokenClient::new(client.clone(), url.clone()))
            }
            None => {
                let secret = config
                    .jwt_secret
                    .as_deref()
                    .ok_or_else(|| anyhow!("JWT_SECRET is required without TOKEN_AUTHORITY_URL"))?;
                info!("Token authority: embedded");
                Arc::new(TokenAuthority::new(
                    SigningSecret::new(secret)?,
                    config.token_ttl(),
                ))
            }
        };

        let geo: Arc<dyn AddressLookup> = match &config.geo_url {
            Some(url) => {
                info!(%url, "Address lookup: remote");
                Arc::new(HttpGeoClient::new(client, url.clone()))
            }
            None => {
                let (api_key, secret_key) = config.dadata_keys().ok_or_else(|| {
                    anyhow!("DADATA_API_KEY and DADATA_SECRET_KEY are required without GEO_PROVIDER_URL")
                })?;
                info!("Address lookup: embedded DaData provider");
                Arc::new(DadataProvider::new(
                    client,
                    api_key,
                    secret_key,
                    config.dadata_base_url.clone(),
                )?)
            }
        };

        Ok(Self::new(identity, tokens, geo))
    }
}

/// Create the gateway router
pub fn router(state: GatewayState) -> Router {
    let protected = Router::new()
        .route("/api/address/search", post(handlers::address_search))
        .route("/api/address/geocode", post(handlers::address_geocode))
        .route("/api/auth/me", get(handlers::me))
        .route("/metrics", get(handlers::metrics))
        .route_layer(from_fn_with_state(state.clone(), authorize));

    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
        .layer(from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
