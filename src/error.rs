//! Error taxonomy shared by every component
//!
//! Each component returns one of these variants; only the gateway decides how
//! a variant is presented to an external caller (see `gateway::responder`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of outcomes a trust-boundary operation can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No stored identity matches the presented name and password.
    #[error("credential mismatch")]
    CredentialMismatch,

    /// Token absent, malformed, expired, or signed with another secret.
    #[error("invalid token")]
    InvalidToken,

    /// Storage or transport failure in a dependency.
    #[error("upstream failure: {0}")]
    Upstream(anyhow::Error),

    /// The caller abandoned the request.
    #[error("request cancelled")]
    Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn upstream(cause: impl Into<anyhow::Error>) -> Self {
        Error::Upstream(cause.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::CredentialMismatch => ErrorKind::CredentialMismatch,
            Error::InvalidToken => ErrorKind::InvalidToken,
            Error::Upstream(_) => ErrorKind::Upstream,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Rebuild a typed error from its wire tag. The message is only carried
    /// along for operators; it never decides the variant.
    pub fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Validation => Error::Validation(message),
            ErrorKind::CredentialMismatch => Error::CredentialMismatch,
            ErrorKind::InvalidToken => Error::InvalidToken,
            ErrorKind::Upstream => Error::Upstream(anyhow::anyhow!(message)),
            ErrorKind::Cancelled => Error::Cancelled,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Error::Cancelled
        } else {
            Error::Upstream(anyhow::anyhow!("blocking task failed: {err}"))
        }
    }
}

/// Wire tag for [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    CredentialMismatch,
    InvalidToken,
    Upstream,
    Cancelled,
}
