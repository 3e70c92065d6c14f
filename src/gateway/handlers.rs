//! Gateway Endpoints
//! Mission: Validate caller input, delegate to the owning service, shape the reply

use crate::error::Error;
use crate::gateway::middleware::{outcome_label, AuthContext};
use crate::gateway::models::{
    RequestAddressGeocode, RequestAddressSearch, RequestAuth, Response, ResponseLogin,
    ResponseMe, ResponseRegister,
};
use crate::gateway::responder::ApiError;
use crate::gateway::GatewayState;
use crate::geo::Address;
use crate::identity::service::MAX_PASSWORD_BYTES;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use tracing::{info, warn};

/// Unwrap a JSON body, turning a malformed payload into a validation error
fn credentials(payload: Result<Json<RequestAuth>, JsonRejection>) -> Result<RequestAuth, Error> {
    let Json(auth) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;
    if !auth.is_complete() {
        return Err(Error::validation("missing name or password"));
    }
    if auth.password.len() > MAX_PASSWORD_BYTES {
        return Err(Error::validation(format!(
            "password longer than {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(auth)
}

/// Register endpoint - POST /api/register
pub async fn register(
    State(state): State<GatewayState>,
    payload: Result<Json<RequestAuth>, JsonRejection>,
) -> Result<Json<Response<ResponseRegister>>, ApiError> {
    let auth = credentials(payload).inspect_err(|err| {
        metrics::counter!("gateway_register_total", 1, "outcome" => outcome_label(err));
    })?;

    let id = state
        .identity
        .create_identity(&auth.name, &auth.password)
        .await
        .inspect_err(|err| {
            metrics::counter!("gateway_register_total", 1, "outcome" => outcome_label(err));
        })?;

    metrics::counter!("gateway_register_total", 1, "outcome" => "ok");
    info!(identity_id = %id, "Identity registered");

    Ok(Json(Response::data(ResponseRegister { id }).with_message(format!(
        "Congratulations, {}, you are successfully registered!",
        auth.name
    ))))
}

/// Login endpoint - POST /api/login
pub async fn login(
    State(state): State<GatewayState>,
    payload: Result<Json<RequestAuth>, JsonRejection>,
) -> Result<Json<Response<ResponseLogin>>, ApiError> {
    let result = async {
        let auth = credentials(payload)?;
        let identity = state
            .identity
            .find_by_name_and_password(&auth.name, &auth.password)
            .await?;
        state.tokens.issue(&identity.name).await
    }
    .await;

    match result {
        Ok(token) => {
            metrics::counter!("gateway_login_total", 1, "outcome" => "ok");
            info!("Login successful");
            Ok(Json(Response::data(ResponseLogin { token })))
        }
        Err(err) => {
            metrics::counter!("gateway_login_total", 1, "outcome" => outcome_label(&err));
            if matches!(err, Error::CredentialMismatch) {
                warn!("Failed login attempt");
            }
            Err(err.into())
        }
    }
}

/// Address search - POST /api/address/search?query=
pub async fn address_search(
    State(state): State<GatewayState>,
    Query(params): Query<RequestAddressSearch>,
) -> Result<Json<Response<Vec<Address>>>, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(Error::validation("empty query").into());
    }

    let addresses = state.geo.address_search(query).await?;
    Ok(Json(Response::data(addresses)))
}

fn coordinate(raw: &str, name: &str, bound: f64) -> Result<f64, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::validation(format!("empty {name}")));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| Error::validation(format!("{name} is not a number")))?;
    if !value.is_finite() || value.abs() > bound {
        return Err(Error::validation(format!(
            "{name} must be within [-{bound}, {bound}]"
        )));
    }
    Ok(value)
}

/// Reverse geocode - POST /api/address/geocode?lat=&lng=
pub async fn address_geocode(
    State(state): State<GatewayState>,
    Query(params): Query<RequestAddressGeocode>,
) -> Result<Json<Response<Vec<Address>>>, ApiError> {
    let lat = coordinate(&params.lat, "lat", 90.0)?;
    let lng = coordinate(&params.lng, "lng", 180.0)?;

    let addresses = state.geo.geocode(lat, lng).await?;
    Ok(Json(Response::data(addresses)))
}

/// Current identity - GET /api/auth/me
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<Response<ResponseMe>> {
    Json(Response::data(ResponseMe { name: ctx.claim }))
}

/// Prometheus exposition - GET /metrics
pub async fn metrics(State(state): State<GatewayState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn health() -> &'static str {
    "OK"
}
