//! Token Authority wire shapes

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueRequest {
    pub claim: String,
}

#[derive(Serialize, Deserialize)]
pub struct IssueResponse {
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub claim: String,
}
