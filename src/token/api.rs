//! Token Authority API Endpoints
//! Mission: Expose issuance and verification to other services over HTTP

use crate::error::Error;
use crate::middleware::request_logging;
use crate::token::authority::TokenAuthority;
use crate::token::models::{IssueRequest, IssueResponse, VerifyRequest, VerifyResponse};
use crate::transport::ServiceError;
use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Routes served by the `token-authority` binary
pub fn router(authority: Arc<TokenAuthority>) -> Router {
    Router::new()
        .route("/tokens/issue", post(issue))
        .route("/tokens/verify", post(verify))
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_logging))
        .with_state(authority)
}

/// POST /tokens/issue
async fn issue(
    State(authority): State<Arc<TokenAuthority>>,
    payload: Result<Json<IssueRequest>, JsonRejection>,
) -> Result<Json<IssueResponse>, ServiceError> {
    let Json(req) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let token = authority.issue(&req.claim)?;
    Ok(Json(IssueResponse { token }))
}

/// POST /tokens/verify
async fn verify(
    State(authority): State<Arc<TokenAuthority>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ServiceError> {
    // An unreadable request carries no token to check.
    let Json(req) = payload.map_err(|_| Error::InvalidToken)?;
    let claim = authority.verify(&req.token)?;
    Ok(Json(VerifyResponse { claim }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::authority::SigningSecret;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let secret = SigningSecret::new("api-test-secret").unwrap();
        router(Arc::new(TokenAuthority::new(secret, None)))
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/tokens/issue", r#"{"claim":"alice"}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(post_json(
                "/tokens/verify",
                serde_json::json!({ "token": token }).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["claim"], "alice");
    }

    #[tokio::test]
    async fn test_verify_garbage_is_invalid_token() {
        let response = app()
            .oneshot(post_json(
                "/tokens/verify",
                r#"{"token":"not.a.jwt"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["kind"], "invalid_token");
    }
}
