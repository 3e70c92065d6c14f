//! Address lookup: the protected downstream capability behind the gateway

pub mod api;
pub mod models;
pub mod provider;

pub use models::Address;
pub use provider::{AddressLookup, DadataProvider, HttpGeoClient};
