//! Integration tests for the places client (wiremock-based)

#![allow(clippy::panic)]

use domain::Location;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_places::{
    AutocompleteRequest, CachedPlacesClient, GeocodeRequest, PlacesClient, PlacesConfig,
    PlacesError, VendorStatus,
};

fn config_for_mock(base_url: &str) -> PlacesConfig {
    PlacesConfig {
        base_url: base_url.to_string(),
        ..PlacesConfig::for_testing()
    }
}

fn caching_config_for_mock(base_url: &str) -> PlacesConfig {
    PlacesConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
        ..PlacesConfig::default()
    }
}

const fn sample_geocode_json() -> &'static str {
    r#"{
        "status": "OK",
        "results": [{
            "formatted_address": "Cl. 10 #43-30, El Poblado, Medellín, Antioquia, Colombia",
            "place_id": "ChIJpoblado",
            "types": ["street_address"],
            "address_components": [
                { "long_name": "Medellín", "short_name": "Medellín", "types": ["locality", "political"] },
                { "long_name": "Colombia", "short_name": "CO", "types": ["country", "political"] }
            ],
            "geometry": {
                "location": { "lat": 6.2086, "lng": -75.5674 },
                "location_type": "ROOFTOP",
                "viewport": {
                    "northeast": { "lat": 6.21, "lng": -75.566 },
                    "southwest": { "lat": 6.207, "lng": -75.569 }
                }
            }
        }]
    }"#
}

const fn sample_autocomplete_json() -> &'static str {
    r#"{
        "status": "OK",
        "predictions": [
            {
                "description": "Centro Parque, Bogotá, Colombia",
                "place_id": "ChIJcentro",
                "types": ["establishment"],
                "terms": [{ "offset": 0, "value": "Centro Parque" }],
                "structured_formatting": { "main_text": "Centro Parque", "secondary_text": "Bogotá, Colombia" }
            },
            {
                "description": "Parque Envigado, Envigado, Colombia",
                "place_id": "ChIJenvigado",
                "types": ["park", "establishment"],
                "distance_meters": 500,
                "terms": [{ "offset": 0, "value": "Parque Envigado" }],
                "structured_formatting": { "main_text": "Parque Envigado", "secondary_text": "Envigado, Colombia" }
            }
        ]
    }"#
}

const fn sample_details_json() -> &'static str {
    r#"{
        "status": "OK",
        "result": {
            "place_id": "ChIJcarmen",
            "name": "Carmen",
            "formatted_address": "Cra. 36 #10a-27, El Poblado, Medellín",
            "geometry": { "location": { "lat": 6.2075, "lng": -75.5662 } },
            "formatted_phone_number": "(604) 311 9625",
            "rating": 4.6,
            "user_ratings_total": 1520,
            "price_level": 3,
            "opening_hours": { "open_now": false, "weekday_text": [] },
            "types": ["restaurant", "food", "establishment"]
        }
    }"#
}

#[tokio::test]
async fn test_geocode_address_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "Calle 10 #43-30, Medellín"))
        .and(query_param("region", "co"))
        .and(query_param("language", "en"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_geocode_json()))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client
        .geocode(GeocodeRequest::address("Calle 10 #43-30, Medellín").with_region("CO"))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place_id, "ChIJpoblado");
    assert_eq!(
        results[0].location.formatted_address(),
        Some("Cl. 10 #43-30, El Poblado, Medellín, Antioquia, Colombia")
    );
}

#[tokio::test]
async fn test_reverse_geocode_sends_latlng() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("latlng", "6.2086,-75.5674"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_geocode_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let location = Location::new(6.2086, -75.5674).unwrap();
    let results = client.reverse_geocode(location).await.unwrap();

    assert_eq!(
        results[0].component("locality").map(|c| c.long_name.as_str()),
        Some("Medellín")
    );
}

#[tokio::test]
async fn test_geocode_cache_hit_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_geocode_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&caching_config_for_mock(&server.uri())).unwrap();
    let request = GeocodeRequest::address("Calle 10 #43-30, Medellín");

    let first = client.geocode(request.clone()).await.unwrap();
    let second = client.geocode(request).await.unwrap();
    assert_eq!(first[0], second[0]);
}

#[tokio::test]
async fn test_geocode_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status": "ZERO_RESULTS", "results": []}"#),
        )
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .geocode(GeocodeRequest::address("qwertyuiop"))
        .await
        .unwrap_err();

    match err {
        PlacesError::Geocoding(e) => {
            assert_eq!(e.code, "ZERO_RESULTS");
            assert_eq!(e.status, VendorStatus::ZeroResults);
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_geocode_request_denied_is_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "results": []}"#,
        ))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .geocode(GeocodeRequest::address("Medellín"))
        .await
        .unwrap_err();

    assert_eq!(err.vendor_status(), Some(VendorStatus::RequestDenied));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_autocomplete_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .and(query_param("input", "Parque"))
        .and(query_param("components", "country:co"))
        .and(query_param("origin", "6.2442,-75.5812"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_autocomplete_json()))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let origin = Location::new(6.2442, -75.5812).unwrap();
    let request = AutocompleteRequest::new("Parque")
        .with_country("CO")
        .with_origin(origin.clone());

    let predictions = client.autocomplete_predictions(request).await.unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[1].main_text, "Parque Envigado");

    let ranked = integration_places::sort_results_by_relevance(predictions, "Parque", Some(&origin));
    assert_eq!(ranked[0].place_id, "ChIJenvigado");
}

#[tokio::test]
async fn test_autocomplete_zero_results_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status": "ZERO_RESULTS", "predictions": []}"#),
        )
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .autocomplete_predictions(AutocompleteRequest::new("zzqx"))
        .await
        .unwrap_err();
    match err {
        PlacesError::Autocomplete { status } => assert_eq!(status, VendorStatus::ZeroResults),
        other => panic!("Expected Autocomplete error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_place_details_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .and(query_param("place_id", "ChIJcarmen"))
        .and(query_param("fields", "name,rating"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_details_json()))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let details = client
        .place_details("ChIJcarmen", &["name".to_string(), "rating".to_string()])
        .await
        .unwrap();

    assert_eq!(details.name, "Carmen");
    assert_eq!(details.rating, Some(4.6));
    assert_eq!(details.price_level, Some(3));
    assert_eq!(details.phone_number.as_deref(), Some("(604) 311 9625"));
}

#[tokio::test]
async fn test_place_details_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "NOT_FOUND"}"#))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.place_details("missing", &[]).await.unwrap_err();

    assert!(matches!(
        err,
        PlacesError::PlaceDetails {
            status: VendorStatus::NotFound
        }
    ));
}

#[tokio::test]
async fn test_http_429_is_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3"))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .geocode(GeocodeRequest::address("Medellín"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlacesError::RateLimitExceeded {
            retry_after_secs: Some(3)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .autocomplete_predictions(AutocompleteRequest::new("Parque"))
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::RequestFailed(_)));
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = CachedPlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.place_details("ChIJcarmen", &[]).await.unwrap_err();

    assert!(matches!(err, PlacesError::ParseError(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let config = config_for_mock("http://127.0.0.1:1");
    let client = CachedPlacesClient::new(&config).unwrap();

    let err = client
        .geocode(GeocodeRequest::address("Medellín"))
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::ConnectionFailed(_)));
}

#[test]
fn test_missing_api_key_is_rejected() {
    let config = PlacesConfig::default();
    let result = CachedPlacesClient::new(&config);
    assert!(matches!(result, Err(PlacesError::ConfigurationError(_))));
}
