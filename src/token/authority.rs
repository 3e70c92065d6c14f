//! Token Authority
//! Mission: Issue and verify bearer tokens bound to the process-wide secret

use crate::error::{Error, Result};
use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Signing key material. Loaded once at startup and never printed.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> anyhow::Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            anyhow::bail!("signing secret must not be empty");
        }
        Ok(Self(secret))
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>, // only present when a TTL is configured
}

/// HS256 issuer/verifier
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenAuthority {
    /// `ttl: None` issues tokens without an expiry claim.
    pub fn new(secret: SigningSecret, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is checked when present but not required.
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(&secret.0),
            decoding_key: DecodingKey::from_secret(&secret.0),
            validation,
            ttl,
        }
    }

    /// Sign a token whose claim is `claim`
    pub fn issue(&self, claim: &str) -> Result<String> {
        let exp = self
            .ttl
            .map(|ttl| (Utc::now().timestamp().max(0) as u64).saturating_add(ttl.as_secs()));

        let claims = Claims {
            username: claim.to_string(),
            exp,
        };

        debug!(claim, has_expiry = exp.is_some(), "Issuing token");
        self.encode_claims(&claims)
    }

    /// Check the signature (and expiry, if carried) and return the claim
    pub fn verify(&self, token: &str) -> Result<String> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {e}");
            Error::InvalidToken
        })?;

        Ok(decoded.claims.username)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| Error::upstream(anyhow!("failed to encode token: {e}")))
    }
}
