//! Authorization gate
//! Mission: Reject every protected request whose bearer token does not verify

use crate::error::Error;
use crate::gateway::responder::ApiError;
use crate::gateway::GatewayState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::debug;

/// Verified claim carried from the gate to the handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub claim: String,
}

/// Metric label for a failed operation
pub(crate) fn outcome_label(err: &Error) -> &'static str {
    match err {
        Error::Validation(_) => "invalid_request",
        Error::CredentialMismatch => "credential_mismatch",
        Error::InvalidToken => "invalid_token",
        Error::Upstream(_) => "upstream_error",
        Error::Cancelled => "cancelled",
    }
}

/// Bearer token from the `Authorization` header, if one is present and non-empty
pub fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Gate middleware: verify the token remotely, then attach [`AuthContext`]
pub async fn authorize(
    State(state): State<GatewayState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&req) else {
        metrics::counter!("gateway_authorization_total", 1, "outcome" => "missing_token");
        debug!(path = %req.uri().path(), "No bearer token presented");
        return Err(Error::InvalidToken.into());
    };

    let claim = state.tokens.verify(&token).await.map_err(|err| {
        metrics::counter!("gateway_authorization_total", 1, "outcome" => outcome_label(&err));
        ApiError(err)
    })?;

    metrics::counter!("gateway_authorization_total", 1, "outcome" => "ok");
    req.extensions_mut().insert(AuthContext { claim });

    Ok(next.run(req).await)
}
