//! Integration tests for the Geoapify search adapter and reverse geocoder.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mealmap_core::Position;
use mealmap_places::{
    geocode::reverse_geocode, search_restaurants, GeoapifyClient, PlacesError, SearchParams,
};

fn test_client(base_url: &str) -> GeoapifyClient {
    GeoapifyClient::new(base_url, "test-key", 5).expect("failed to build test GeoapifyClient")
}

fn params(latitude: f64, longitude: f64, cuisine: &str, limit: u32) -> SearchParams {
    SearchParams {
        position: Position {
            latitude,
            longitude,
        },
        radius_meters: 2000,
        limit,
        cuisine_filter: cuisine.to_owned(),
    }
}

fn feature(name: &str, distance: f64, categories: &[&str]) -> serde_json::Value {
    json!({
        "properties": {
            "place_id": format!("pid-{name}"),
            "name": name,
            "lat": 22.32,
            "lon": 114.17,
            "distance": distance,
            "categories": categories,
        }
    })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sorts_results_by_ascending_distance() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "features": [
                feature("Far Wok", 500.0, &["catering.restaurant.chinese"]),
                feature("Near Wok", 150.0, &["catering.restaurant.chinese"]),
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let restaurants = search_restaurants(&client, &params(22.3193, 114.1694, "chinese", 30))
        .await
        .expect("search failed");

    assert_eq!(restaurants.len(), 2);
    assert_eq!(restaurants[0].name, "Near Wok");
    assert_eq!(restaurants[0].distance_meters, 150.0);
    assert_eq!(restaurants[1].name, "Far Wok");
    assert_eq!(restaurants[1].distance_meters, 500.0);
}

#[tokio::test]
async fn search_requests_the_mapped_cuisine_category() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .and(query_param("categories", "catering.restaurant.chinese"))
        .and(query_param("filter", "circle:114.1694,22.3193,2000"))
        .and(query_param("bias", "proximity:114.1694,22.3193"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let restaurants = search_restaurants(&client, &params(22.3193, 114.1694, "chinese", 30))
        .await
        .expect("search failed");
    assert!(restaurants.is_empty());
}

#[tokio::test]
async fn unknown_cuisine_falls_back_to_all_restaurants() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .and(query_param("categories", "catering.restaurant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    search_restaurants(&client, &params(22.3193, 114.1694, "klingon", 30))
        .await
        .expect("search failed");
}

#[tokio::test]
async fn limit_above_provider_cap_is_clamped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    search_restaurants(&client, &params(22.3193, 114.1694, "all", 1000))
        .await
        .expect("search failed");
}

#[tokio::test]
async fn invalid_coordinates_make_no_provider_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "features": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = search_restaurants(&client, &params(91.0, 200.0, "all", 30)).await;

    assert!(
        matches!(result, Err(PlacesError::InvalidCoordinates { .. })),
        "expected InvalidCoordinates, got: {result:?}"
    );
}

#[tokio::test]
async fn provider_error_status_is_surfaced_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = search_restaurants(&client, &params(22.3193, 114.1694, "all", 30)).await;

    assert!(
        matches!(result, Err(PlacesError::UnexpectedStatus { status: 500 })),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_payload_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = search_restaurants(&client, &params(22.3193, 114.1694, "all", 30)).await;

    assert!(
        matches!(result, Err(PlacesError::Deserialize { .. })),
        "expected Deserialize error, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Reverse geocode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reverse_geocode_returns_first_feature() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geocode/reverse"))
        .and(query_param("lat", "22.3193"))
        .and(query_param("lon", "114.1694"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "features": [{
                "properties": {
                    "formatted": "1 Nathan Road, Tsim Sha Tsui, Hong Kong",
                    "city": "Hong Kong",
                    "suburb": "Tsim Sha Tsui",
                    "country": "Hong Kong"
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let geocoded = reverse_geocode(&client, 22.3193, 114.1694)
        .await
        .expect("reverse geocode failed");

    assert_eq!(geocoded.address, "1 Nathan Road, Tsim Sha Tsui, Hong Kong");
    assert_eq!(geocoded.district.as_deref(), Some("Tsim Sha Tsui"));
    assert_eq!(geocoded.country.as_deref(), Some("Hong Kong"));
}

#[tokio::test]
async fn reverse_geocode_with_no_features_is_no_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geocode/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "features": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = reverse_geocode(&client, 22.3193, 114.1694).await;

    assert!(
        matches!(result, Err(PlacesError::NoResult { .. })),
        "expected NoResult, got: {result:?}"
    );
}
