//! Identity Models
//! Mission: Define the stored account record and its request/response shapes

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: String,
}

impl Identity {
    /// Build a fresh record around an already computed hash
    pub fn new(name: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            password_hash,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Name + plaintext password, used for both creation and matching
#[derive(Deserialize, Serialize)]
pub struct CredentialsRequest {
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateIdentityResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteIdentityResponse {
    pub deleted: bool,
}

/// Pagination for administrative listing
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    100
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}
