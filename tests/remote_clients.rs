//! HTTP clients driven against real routers bound on loopback

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use geoauth::geo::{self, AddressLookup, DadataProvider, HttpGeoClient};
use geoauth::identity::{
    self, HttpIdentityClient, IdentityClient, IdentityService, SqliteIdentityRepository,
};
use geoauth::token::{self, HttpTokenClient, SigningSecret, TokenAuthority, TokenClient};
use geoauth::transport::http_client;
use geoauth::Error;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_identity_errors_survive_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let repository = SqliteIdentityRepository::new(dir.path().join("identities.db")).unwrap();
    let service = IdentityService::with_cost(Arc::new(repository), 4);
    let base = spawn(identity::api::router(service)).await;

    let remote = HttpIdentityClient::new(client(), base);
    let id = remote.create_identity("alice", "pw1").await.unwrap();

    let identity = remote
        .find_by_name_and_password("alice", "pw1")
        .await
        .unwrap();
    assert_eq!(identity.id, id);
    assert_eq!(identity.name, "alice");
    assert!(identity.password_hash.is_empty());

    let err = remote
        .find_by_name_and_password("alice", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CredentialMismatch), "{err:?}");

    let err = remote.create_identity("", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn test_token_round_trip_over_http() {
    let secret = SigningSecret::new("remote-secret").unwrap();
    let base = spawn(token::api::router(Arc::new(TokenAuthority::new(secret, None)))).await;

    let remote = HttpTokenClient::new(client(), base);
    let token = remote.issue("alice").await.unwrap();
    assert_eq!(remote.verify(&token).await.unwrap(), "alice");

    let err = remote.verify("not-a-token").await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken), "{err:?}");

    // Signed elsewhere
    let foreign = TokenAuthority::new(SigningSecret::new("other").unwrap(), None)
        .issue("alice")
        .unwrap();
    let err = remote.verify(&foreign).await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_service_is_upstream() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = HttpTokenClient::new(client(), format!("http://{addr}"));
    let err = remote.verify("anything").await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)), "{err:?}");
}

/// Minimal stand-in for the DaData suggestions API
fn fake_dadata() -> Router {
    async fn suggest(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Token key")
            || headers.get("x-secret").and_then(|v| v.to_str().ok()) != Some("secret")
        {
            return (StatusCode::FORBIDDEN, Json(json!({})));
        }
        assert_eq!(body["query"], "tverskaya");
        (
            StatusCode::OK,
            Json(json!({
                "suggestions": [
                    {"value": "г Москва, ул Тверская, д 1", "data": {
                        "city": "Москва", "street": "Тверская", "house": "1",
                        "geo_lat": "55.757", "geo_lon": "37.614"
                    }},
                    {"value": "Московская обл", "data": {
                        "city": null, "street": null, "house": null,
                        "geo_lat": null, "geo_lon": null
                    }}
                ]
            })),
        )
    }

    async fn geolocate(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["lat"], 55.757);
        assert_eq!(body["lon"], 37.614);
        Json(json!({
            "suggestions": [
                {"data": {"city": "Москва", "street": "Тверская", "house": "1"}}
            ]
        }))
    }

    Router::new()
        .route("/suggest/address", post(suggest))
        .route("/geolocate/address", post(geolocate))
}

#[tokio::test]
async fn test_dadata_provider_behind_geo_service() {
    let dadata = spawn(fake_dadata()).await;
    let provider: Arc<dyn AddressLookup> =
        Arc::new(DadataProvider::new(client(), "key", "secret", Some(dadata.clone())).unwrap());
    let base = spawn(geo::api::router(provider)).await;

    let remote = HttpGeoClient::new(client(), base);
    let found = remote.address_search("tverskaya").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].city, "Москва");
    assert_eq!(found[0].lat, "55.757");

    let found = remote.geocode(55.757, 37.614).await.unwrap();
    assert_eq!(found[0].house, "1");
    assert_eq!(found[0].lat, "");

    let wrong_keys = DadataProvider::new(client(), "nope", "nope", Some(dadata)).unwrap();
    let err = wrong_keys.address_search("tverskaya").await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)), "{err:?}");
}
