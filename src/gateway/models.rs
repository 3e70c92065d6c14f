//! Gateway request/response bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Register/login body
#[derive(Deserialize)]
pub struct RequestAuth {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl RequestAuth {
    /// Both fields must be non-empty before any downstream call
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseRegister {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseLogin {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMe {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestAddressSearch {
    #[serde(default)]
    pub query: String,
}

/// Coordinates arrive as raw strings and are validated by the handler
#[derive(Debug, Deserialize)]
pub struct RequestAddressGeocode {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
}

/// Uniform envelope for every gateway response
#[derive(Debug, Serialize, Deserialize)]
pub struct Response<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Response<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
