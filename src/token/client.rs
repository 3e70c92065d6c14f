//! Token Authority client path

use crate::error::Result;
use crate::token::authority::TokenAuthority;
use crate::token::models::{IssueRequest, IssueResponse, VerifyRequest, VerifyResponse};
use crate::transport::{endpoint, send_json};
use async_trait::async_trait;
use reqwest::Client;

#[async_trait]
pub trait TokenClient: Send + Sync {
    async fn issue(&self, claim: &str) -> Result<String>;

    async fn verify(&self, token: &str) -> Result<String>;
}

#[async_trait]
impl TokenClient for TokenAuthority {
    async fn issue(&self, claim: &str) -> Result<String> {
        TokenAuthority::issue(self, claim)
    }

    async fn verify(&self, token: &str) -> Result<String> {
        TokenAuthority::verify(self, token)
    }
}

/// Remote authority reached through `token::api::router`
#[derive(Clone)]
pub struct HttpTokenClient {
    client: Client,
    base_url: String,
}

impl HttpTokenClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenClient for HttpTokenClient {
    async fn issue(&self, claim: &str) -> Result<String> {
        let resp: IssueResponse = send_json(
            self.client
                .post(endpoint(&self.base_url, "/tokens/issue"))
                .json(&IssueRequest {
                    claim: claim.to_string(),
                }),
        )
        .await?;
        Ok(resp.token)
    }

    async fn verify(&self, token: &str) -> Result<String> {
        let resp: VerifyResponse = send_json(
            self.client
                .post(endpoint(&self.base_url, "/tokens/verify"))
                .json(&VerifyRequest {
                    token: token.to_string(),
                }),
        )
        .await?;
        Ok(resp.claim)
    }
}
