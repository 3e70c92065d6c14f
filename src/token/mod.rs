//! Token Authority Module
//! Mission: Turn a verified identity into a signed, verifiable bearer token

pub mod api;
pub mod authority;
pub mod client;
pub mod models;

pub use authority::{SigningSecret, TokenAuthority};
pub use client::{HttpTokenClient, TokenClient};
