//! Client-visible error mapping
//!
//! The only place where an [`Error`] becomes an HTTP status and body.

use crate::error::Error;
use crate::gateway::models::Response as Envelope;
use crate::transport::client_closed_request;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(message) => {
                info!("http response bad request: {message}");
                (
                    StatusCode::BAD_REQUEST,
                    Json(Envelope::<()>::failure(message)),
                )
                    .into_response()
            }
            Error::CredentialMismatch => {
                warn!("http response forbidden: credential mismatch");
                (
                    StatusCode::FORBIDDEN,
                    Json(Envelope::<()>::failure("invalid name or password")),
                )
                    .into_response()
            }
            Error::InvalidToken => {
                warn!("http response unauthorized: invalid token");
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(Envelope::<()>::failure("invalid or missing token")),
                )
                    .into_response()
            }
            Error::Upstream(cause) => {
                // Cause stays in the logs; the caller gets nothing specific.
                error!("http response internal error: {cause:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Envelope::<()>::failure("internal server error")),
                )
                    .into_response()
            }
            Error::Cancelled => {
                debug!("request cancelled, no response body");
                client_closed_request().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (Error::validation("missing name"), StatusCode::BAD_REQUEST),
            (Error::CredentialMismatch, StatusCode::FORBIDDEN),
            (Error::InvalidToken, StatusCode::UNAUTHORIZED),
            (
                Error::upstream(anyhow::anyhow!("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_upstream_cause_is_not_exposed() {
        let cause = anyhow::anyhow!("password=hunter2 at 10.0.0.3");
        let response = ApiError(Error::upstream(cause)).into_response();
        let text = body_text(response).await;

        assert!(text.contains("internal server error"));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_invalid_token_challenges_bearer() {
        let response = ApiError(Error::InvalidToken).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_cancelled_writes_no_body() {
        let response = ApiError(Error::Cancelled).into_response();
        assert_eq!(response.status().as_u16(), 499);
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_validation_message_reaches_caller() {
        let response = ApiError(Error::validation("empty query")).into_response();
        let text = body_text(response).await;
        assert!(text.contains(r#""success":false"#));
        assert!(text.contains("empty query"));
    }
}
