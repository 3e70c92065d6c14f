//! Runtime configuration for every binary.
//!
//! Each binary parses its own clap struct; every flag has an env fallback so
//! the services can be driven from a `.env` file in deployment.

use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load `.env` from the working directory (and parents), then the crate root.
pub fn load_env() {
    let _ = dotenv();

    // Also try the crate root when running with --manifest-path from elsewhere.
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

fn ttl_from_secs(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|s| *s > 0).map(Duration::from_secs)
}

/// Public gateway
#[derive(Debug, Clone, Parser)]
#[command(name = "gateway", about = "Authorization gateway in front of the address lookup")]
pub struct GatewayConfig {
    #[arg(long, env = "GATEWAY_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Remote identity service; embedded SQLite store when unset
    #[arg(long, env = "IDENTITY_URL")]
    pub identity_url: Option<String>,

    #[arg(long, env = "IDENTITY_DB_PATH", default_value = "geoauth_identity.db")]
    pub identity_db: PathBuf,

    /// Remote token authority; embedded signer when unset
    #[arg(long, env = "TOKEN_AUTHORITY_URL")]
    pub token_url: Option<String>,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "TOKEN_TTL_SECS")]
    pub token_ttl_secs: Option<u64>,

    /// Remote geo provider; embedded DaData client when unset
    #[arg(long, env = "GEO_PROVIDER_URL")]
    pub geo_url: Option<String>,

    #[arg(long, env = "DADATA_API_KEY", hide_env_values = true)]
    pub dadata_api_key: Option<String>,

    #[arg(long, env = "DADATA_SECRET_KEY", hide_env_values = true)]
    pub dadata_secret_key: Option<String>,

    #[arg(long, env = "DADATA_BASE_URL")]
    pub dadata_base_url: Option<String>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
}

impl GatewayConfig {
    pub fn token_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.token_ttl_secs)
    }

    pub fn dadata_keys(&self) -> Option<(&str, &str)> {
        match (&self.dadata_api_key, &self.dadata_secret_key) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

/// Standalone identity store
#[derive(Debug, Clone, Parser)]
#[command(name = "identity-service", about = "Identity store over HTTP")]
pub struct IdentityServiceConfig {
    #[arg(long, env = "IDENTITY_LISTEN", default_value = "0.0.0.0:50051")]
    pub listen: SocketAddr,

    #[arg(long = "db", env = "IDENTITY_DB_PATH", default_value = "geoauth_identity.db")]
    pub db_path: PathBuf,

    /// Keep identities in memory only
    #[arg(long)]
    pub in_memory: bool,
}

/// Standalone token authority
#[derive(Debug, Clone, Parser)]
#[command(name = "token-authority", about = "Token issuing and verification over HTTP")]
pub struct TokenAuthorityConfig {
    #[arg(long, env = "TOKEN_AUTHORITY_LISTEN", default_value = "0.0.0.0:50052")]
    pub listen: SocketAddr,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "TOKEN_TTL_SECS")]
    pub token_ttl_secs: Option<u64>,
}

impl TokenAuthorityConfig {
    pub fn token_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.token_ttl_secs)
    }
}

/// Standalone geo provider
#[derive(Debug, Clone, Parser)]
#[command(name = "geo-provider", about = "DaData address lookup over HTTP")]
pub struct GeoProviderConfig {
    #[arg(long, env = "GEO_PROVIDER_LISTEN", default_value = "0.0.0.0:50053")]
    pub listen: SocketAddr,

    #[arg(long, env = "DADATA_API_KEY", hide_env_values = true)]
    pub dadata_api_key: String,

    #[arg(long, env = "DADATA_SECRET_KEY", hide_env_values = true)]
    pub dadata_secret_key: String,

    #[arg(long, env = "DADATA_BASE_URL")]
    pub dadata_base_url: Option<String>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
}
