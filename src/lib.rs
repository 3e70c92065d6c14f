//! Authenticated address lookup: a public gateway in front of an identity
//! store, a token authority and a DaData-backed geo provider.

pub mod config;
pub mod error;
pub mod gateway;
pub mod geo;
pub mod identity;
pub mod middleware;
pub mod telemetry;
pub mod token;
pub mod transport;

pub use error::{Error, Result};
