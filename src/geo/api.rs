//! Geo Provider API Endpoints

use crate::error::Error;
use crate::geo::models::{AddressSearchRequest, AddressesResponse, GeocodeRequest};
use crate::geo::provider::AddressLookup;
use crate::middleware::request_logging;
use crate::transport::ServiceError;
use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Routes served by the `geo-provider` binary
pub fn router(provider: Arc<dyn AddressLookup>) -> Router {
    Router::new()
        .route("/address/search", post(address_search))
        .route("/address/geocode", post(geocode))
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_logging))
        .with_state(provider)
}

async fn address_search(
    State(provider): State<Arc<dyn AddressLookup>>,
    payload: Result<Json<AddressSearchRequest>, JsonRejection>,
) -> Result<Json<AddressesResponse>, ServiceError> {
    let Json(req) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let addresses = provider.address_search(&req.query).await?;
    Ok(Json(AddressesResponse { addresses }))
}

async fn geocode(
    State(provider): State<Arc<dyn AddressLookup>>,
    payload: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Json<AddressesResponse>, ServiceError> {
    let Json(req) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let addresses = provider.geocode(req.lat, req.lng).await?;
    Ok(Json(AddressesResponse { addresses }))
}
