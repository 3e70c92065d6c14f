//! Address lookup data structures

use serde::{Deserialize, Serialize};

/// One resolved address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house: String,
    pub lat: String,
    pub lon: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressSearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeocodeRequest {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressesResponse {
    pub addresses: Vec<Address>,
}

/// DaData suggestions payload (only the fields we read)
#[derive(Debug, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct Suggestion {
    pub data: SuggestionData,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionData {
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub geo_lat: Option<String>,
    pub geo_lon: Option<String>,
}

impl From<SuggestionData> for Address {
    fn from(data: SuggestionData) -> Self {
        Self {
            city: data.city.unwrap_or_default(),
            street: data.street.unwrap_or_default(),
            house: data.house.unwrap_or_default(),
            lat: data.geo_lat.unwrap_or_default(),
            lon: data.geo_lon.unwrap_or_default(),
        }
    }
}
