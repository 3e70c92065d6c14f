//! Address lookup providers
//!
//! [`AddressLookup`] is the protected resource contract the gateway
//! dispatches to. [`DadataProvider`] talks to the DaData suggestions API;
//! [`HttpGeoClient`] reaches a `geo-provider` process.

use crate::error::{Error, Result};
use crate::geo::models::{
    Address, AddressSearchRequest, AddressesResponse, GeocodeRequest, SuggestionsResponse,
};
use crate::transport::{endpoint, send_json};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::json;
use tracing::debug;

pub const DADATA_API_BASE: &str = "https://suggestions.dadata.ru/suggestions/api/4_1/rs";

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn address_search(&self, query: &str) -> Result<Vec<Address>>;

    async fn geocode(&self, lat: f64, lng: f64) -> Result<Vec<Address>>;
}

#[derive(Clone)]
pub struct DadataProvider {
    client: Client,
    base_url: String,
    headers: header::HeaderMap,
}

impl DadataProvider {
    pub fn new(
        client: Client,
        api_key: &str,
        secret_key: &str,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Token {api_key}")
                .parse()
                .context("Invalid DaData api key")?,
        );
        headers.insert(
            "X-Secret",
            secret_key.parse().context("Invalid DaData secret key")?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DADATA_API_BASE.to_string()),
            headers,
        })
    }

    async fn suggestions(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<SuggestionsResponse> {
        let resp = self
            .client
            .post(endpoint(&self.base_url, path))
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::upstream)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(anyhow!("POST {path} {status}: {text}")));
        }

        resp.json::<SuggestionsResponse>()
            .await
            .map_err(|e| Error::upstream(anyhow!("Failed to parse suggestions: {e}")))
    }
}

/// Keep only suggestions with both a city and a street
pub fn searchable_addresses(resp: SuggestionsResponse) -> Vec<Address> {
    resp.suggestions
        .into_iter()
        .map(|s| Address::from(s.data))
        .filter(|a| !a.city.is_empty() && !a.street.is_empty())
        .collect()
}

#[async_trait]
impl AddressLookup for DadataProvider {
    async fn address_search(&self, query: &str) -> Result<Vec<Address>> {
        let resp = self
            .suggestions("/suggest/address", json!({ "query": query }))
            .await?;
        let addresses = searchable_addresses(resp);
        debug!(count = addresses.len(), "Address search");
        Ok(addresses)
    }

    async fn geocode(&self, lat: f64, lng: f64) -> Result<Vec<Address>> {
        let resp = self
            .suggestions("/geolocate/address", json!({ "lat": lat, "lon": lng }))
            .await?;
        Ok(resp
            .suggestions
            .into_iter()
            .map(|s| Address::from(s.data))
            .collect())
    }
}

/// Remote provider reached through `geo::api::router`
#[derive(Clone)]
pub struct HttpGeoClient {
    client: Client,
    base_url: String,
}

impl HttpGeoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AddressLookup for HttpGeoClient {
    async fn address_search(&self, query: &str) -> Result<Vec<Address>> {
        let resp: AddressesResponse = send_json(
            self.client
                .post(endpoint(&self.base_url, "/address/search"))
                .json(&AddressSearchRequest {
                    query: query.to_string(),
                }),
        )
        .await?;
        Ok(resp.addresses)
    }

    async fn geocode(&self, lat: f64, lng: f64) -> Result<Vec<Address>> {
        let resp: AddressesResponse = send_json(
            self.client
                .post(endpoint(&self.base_url, "/address/geocode"))
                .json(&GeocodeRequest { lat, lng }),
        )
        .await?;
        Ok(resp.addresses)
    }
}
