//! Service-to-service framing
//!
//! Internal services answer failures with a `{kind, message}` envelope so the
//! calling client can rebuild the typed [`Error`]. Status codes here are
//! framing only; the gateway owns what external callers see.

use crate::error::{Error, ErrorKind};
use anyhow::anyhow;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Failure envelope exchanged between internal services.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<Error> for RemoteError {
    fn from(err: Error) -> Self {
        let kind = err.kind();
        let message = match &err {
            Error::Upstream(cause) => format!("{cause:#}"),
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

/// Error wrapper returned by internal service handlers.
#[derive(Debug)]
pub struct ServiceError(pub Error);

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        ServiceError(err)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::CredentialMismatch | ErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
            ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Cancelled => client_closed_request(),
        };

        match &self.0 {
            Error::Upstream(cause) => error!("internal service failure: {cause:#}"),
            Error::Cancelled => debug!("internal request cancelled by caller"),
            _ => {}
        }

        (status, Json(RemoteError::from(self.0))).into_response()
    }
}

/// Non-standard 499 used when the caller went away before an answer existed.
pub fn client_closed_request() -> StatusCode {
    StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Build the outbound HTTP client used by every remote dependency client.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    use anyhow::Context;

    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .context("Failed to build upstream HTTP client")
}

/// Join a base URL and a path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Send a request and decode either the success body or the error envelope.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Error> {
    let resp = request.send().await.map_err(Error::upstream)?;
    let status = resp.status();

    if status.is_success() {
        return resp
            .json::<T>()
            .await
            .map_err(|e| Error::upstream(anyhow!("malformed upstream response: {e}")));
    }

    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<RemoteError>(&text) {
        Ok(remote) => Err(Error::from_kind(remote.kind, remote.message)),
        Err(_) => Err(Error::upstream(anyhow!("upstream returned {status}: {text}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("http://identity:50051/", "/identities"),
            "http://identity:50051/identities"
        );
        assert_eq!(
            endpoint("http://identity:50051", "/identities"),
            "http://identity:50051/identities"
        );
    }

    #[test]
    fn test_remote_error_carries_kind() {
        let remote = RemoteError::from(Error::CredentialMismatch);
        assert_eq!(remote.kind, ErrorKind::CredentialMismatch);

        let remote = RemoteError::from(Error::upstream(anyhow!("disk full")));
        assert_eq!(remote.kind, ErrorKind::Upstream);
        assert!(remote.message.contains("disk full"));
    }

    #[test]
    fn test_service_error_status() {
        let resp = ServiceError(Error::validation("empty name")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ServiceError(Error::InvalidToken).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = ServiceError(Error::Cancelled).into_response();
        assert_eq!(resp.status().as_u16(), 499);
    }
}
