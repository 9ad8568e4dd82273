//! OpenWeatherMap client tests against a local mock server

use pretty_assertions::assert_eq;
use serde_json::json;
use weather_gauge::api::OpenWeatherClient;
use weather_gauge::config::WeatherConfig;
use weather_gauge::error::FetchError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenWeatherClient {
    let config = WeatherConfig::new("test-key".into())
        .with_base_url(server.uri())
        .with_timeout(5);
    OpenWeatherClient::new(config).unwrap()
}

fn current_body() -> serde_json::Value {
    json!({
        "name": "Berlin",
        "dt": 1_717_243_200,
        "sys": { "country": "DE" },
        "main": { "temp": 21.4, "feels_like": 20.9, "humidity": 48 },
        "wind": { "speed": 4.1, "deg": 250 },
        "clouds": { "all": 20 },
        "weather": [{ "main": "Clouds", "description": "few clouds" }]
    })
}

fn forecast_body() -> serde_json::Value {
    json!({
        "city": { "name": "Berlin", "timezone": 7200 },
        "list": [
            {
                "dt": 1_717_286_400,
                "main": { "temp": 14.2 },
                "weather": [{ "main": "Clear" }],
                "pop": 0.1
            },
            {
                "dt": 1_717_297_200,
                "main": { "temp": 23.8 },
                "weather": [{ "main": "Rain" }],
                "pop": 0.7
            }
        ]
    })
}

async fn mount_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Berlin"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_bundle_success() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let bundle = client_for(&server).fetch_bundle("Berlin").await.unwrap();

    assert_eq!(bundle.current.display_name(), "Berlin, DE");
    assert_eq!(bundle.current.temperature_c, Some(21.4));
    assert_eq!(bundle.current.humidity_pct, Some(48));
    assert_eq!(bundle.current.condition_main.as_deref(), Some("Clouds"));
    assert_eq!(bundle.forecast.samples.len(), 2);
    assert_eq!(bundle.forecast.timezone_offset_secs, 7200);
    assert_eq!(bundle.forecast.samples[1].condition_main, "Rain");
    assert_eq!(bundle.forecast.samples[1].precipitation_probability, Some(0.7));
}

#[tokio::test]
async fn test_city_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "São Paulo,BR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "São Paulo" })))
        .expect(1)
        .mount(&server)
        .await;

    let current = client_for(&server)
        .fetch_current("São Paulo,BR")
        .await
        .unwrap();

    assert_eq!(current.city_name, "São Paulo");
    assert_eq!(current.temperature_c, None);
}

#[tokio::test]
async fn test_unknown_city_is_city_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_bundle("Atlantis").await.unwrap_err();

    assert!(matches!(err, FetchError::CityNotFound(ref city) if city == "Atlantis"));
    assert_eq!(err.to_string(), "city not found: Atlantis");
}

#[tokio::test]
async fn test_bad_key_reports_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current("Berlin").await.unwrap_err();

    match err {
        FetchError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_status_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_forecast("Berlin").await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Status { status: 503, ref message } if message == "Service Unavailable"
    ));
}

#[tokio::test]
async fn test_forecast_failure_fails_bundle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_bundle("Berlin").await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current("Berlin").await.unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)), "{err:?}");
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn test_connection_error_hides_api_key() {
    // Nothing listens on port 1
    let config = WeatherConfig::new("secret-key".into())
        .with_base_url("http://127.0.0.1:1")
        .with_timeout(2);
    let client = OpenWeatherClient::new(config).unwrap();

    let err = client.fetch_current("Berlin").await.unwrap_err();

    assert!(matches!(err, FetchError::Request(_)), "{err:?}");
    assert!(!err.to_string().contains("secret-key"));
}
