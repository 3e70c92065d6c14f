//! Identity Store API Endpoints
//! Mission: Expose credential custody to other services over HTTP

use crate::error::Error;
use crate::identity::models::{
    CreateIdentityResponse, CredentialsRequest, DeleteIdentityResponse, Identity, ListParams,
};
use crate::identity::service::IdentityService;
use crate::middleware::request_logging;
use crate::transport::ServiceError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Routes served by the `identity-service` binary
pub fn router(service: IdentityService) -> Router {
    Router::new()
        .route("/identities", post(create_identity).get(list_identities))
        .route("/identities/match", post(match_identity))
        .route(
            "/identities/:id",
            get(get_identity).delete(delete_identity),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_logging))
        .with_state(service)
}

fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, ServiceError> {
    payload
        .map(|Json(req)| req)
        .map_err(|e| Error::validation(e.body_text()).into())
}

/// POST /identities
async fn create_identity(
    State(service): State<IdentityService>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<CreateIdentityResponse>, ServiceError> {
    let req = credentials(payload)?;
    let id = service.create_identity(&req.name, &req.password).await?;
    Ok(Json(CreateIdentityResponse { id }))
}

/// POST /identities/match
async fn match_identity(
    State(service): State<IdentityService>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<Identity>, ServiceError> {
    let req = credentials(payload)?;
    let identity = service
        .find_by_name_and_password(&req.name, &req.password)
        .await?;
    Ok(Json(identity))
}

/// GET /identities/:id
async fn get_identity(
    State(service): State<IdentityService>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    match service.get_by_id(id).await? {
        Some(identity) => Ok(Json(identity).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// GET /identities?limit=&offset=
async fn list_identities(
    State(service): State<IdentityService>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Identity>>, ServiceError> {
    Ok(Json(service.list(params.limit, params.offset).await?))
}

/// DELETE /identities/:id
async fn delete_identity(
    State(service): State<IdentityService>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteIdentityResponse>, ServiceError> {
    let deleted = service.delete(id).await?;
    Ok(Json(DeleteIdentityResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::memory::MemoryIdentityRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let repo = Arc::new(MemoryIdentityRepository::new());
        router(IdentityService::with_cost(repo, 4))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_match_over_http() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/identities",
                r#"{"name":"alice","password":"pw1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(post_json(
                "/identities/match",
                r#"{"name":"alice","password":"pw1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "alice");
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_mismatch_envelope() {
        let response = app()
            .oneshot(post_json(
                "/identities/match",
                r#"{"name":"alice","password":"nope"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "credential_mismatch");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/identities/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
