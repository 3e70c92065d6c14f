//! Identity Store client path
//!
//! The gateway reaches the store through [`IdentityClient`], either in-process
//! via [`IdentityService`] or over HTTP via [`HttpIdentityClient`].

use crate::error::Result;
use crate::identity::models::{CreateIdentityResponse, CredentialsRequest, Identity};
use crate::identity::service::IdentityService;
use crate::transport::{endpoint, send_json};
use async_trait::async_trait;
use reqwest::Client;
use uuid::Uuid;

#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn create_identity(&self, name: &str, password: &str) -> Result<Uuid>;

    async fn find_by_name_and_password(&self, name: &str, password: &str) -> Result<Identity>;
}

#[async_trait]
impl IdentityClient for IdentityService {
    async fn create_identity(&self, name: &str, password: &str) -> Result<Uuid> {
        IdentityService::create_identity(self, name, password).await
    }

    async fn find_by_name_and_password(&self, name: &str, password: &str) -> Result<Identity> {
        IdentityService::find_by_name_and_password(self, name, password).await
    }
}

/// Remote identity store reached through `identity::api::router`
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
}

impl HttpIdentityClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn create_identity(&self, name: &str, password: &str) -> Result<Uuid> {
        let body = CredentialsRequest {
            name: name.to_string(),
            password: password.to_string(),
        };
        let resp: CreateIdentityResponse = send_json(
            self.client
                .post(endpoint(&self.base_url, "/identities"))
                .json(&body),
        )
        .await?;
        Ok(resp.id)
    }

    async fn find_by_name_and_password(&self, name: &str, password: &str) -> Result<Identity> {
        let body = CredentialsRequest {
            name: name.to_string(),
            password: password.to_string(),
        };
        send_json(
            self.client
                .post(endpoint(&self.base_url, "/identities/match"))
                .json(&body),
        )
        .await
    }
}
