//! Contract tests for the current-weather lookup against a mock OpenWeather server.

use std::time::Duration;

use weather_core::{Config, FetchErrorKind, OpenWeatherProvider, WeatherClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 21.7, "feels_like": 21.2, "humidity": 64, "pressure": 1012},
        "visibility": 8000,
        "wind": {"speed": 5.0, "deg": 240},
        "dt": 1718893200,
        "sys": {"country": "GB"},
        "name": "London",
        "cod": 200
    })
}

fn client_for(server: &MockServer) -> WeatherClient {
    let provider = OpenWeatherProvider::builder(API_KEY)
        .base_url(server.uri())
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    WeatherClient::new(Box::new(provider))
}

async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "cod": status.to_string(),
            "message": "mock failure"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_success_maps_and_converts_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server).fetch_weather("  London ").await.unwrap();

    assert_eq!(reading.name, "London");
    assert_eq!(reading.country, "GB");
    assert_eq!(reading.temperature_c, 22);
    assert_eq!(reading.feels_like_c, 21);
    assert_eq!(reading.humidity_pct, 64);
    assert_eq!(reading.wind_speed_kmh, 18);
    assert_eq!(reading.visibility_display().as_deref(), Some("8.0"));
    assert_eq!(reading.description, "light rain");
    assert_eq!(
        reading.icon_url().as_deref(),
        Some("https://openweathermap.org/img/wn/10d@2x.png")
    );
}

#[tokio::test]
async fn test_city_name_is_url_encoded() {
    let server = MockServer::start().await;

    // query_param matches the decoded value, so this only passes if encoding round-trips.
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "São Paulo & Co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_weather("São Paulo & Co").await;
    assert!(result.is_ok(), "unexpected error: {result:?}");
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    mount_status(&server, 404).await;

    let err = client_for(&server).fetch_weather("Atlantis").await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NotFound);
    assert_eq!(err.status, Some(404));
    assert!(err.message.starts_with("Location not found"));
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    mount_status(&server, 401).await;

    let err = client_for(&server).fetch_weather("London").await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::Unauthorized);
    assert!(err.message.contains("API key"));
}

#[tokio::test]
async fn test_other_status_is_server_error() {
    let server = MockServer::start().await;
    mount_status(&server, 500).await;

    let err = client_for(&server).fetch_weather("London").await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::ServerError);
    assert!(err.message.contains("500"), "message should mention status: {}", err.message);
}

#[tokio::test]
async fn test_undecodable_success_body_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captive portal</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_weather("London").await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::ServerError);
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    // Grab a free port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = OpenWeatherProvider::builder(API_KEY)
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let client = WeatherClient::new(Box::new(provider));

    let err = client.fetch_weather("London").await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NetworkFailure);
    assert!(err.message.starts_with("Network error"));
}

#[tokio::test]
async fn test_timeout_is_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::builder(API_KEY)
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = WeatherClient::new(Box::new(provider));

    let err = client.fetch_weather("London").await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::NetworkFailure);
}

#[tokio::test]
async fn test_blank_query_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_weather("   ").await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Validation);
}

#[tokio::test]
async fn test_repeated_lookups_are_structurally_equal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.fetch_weather("London").await.unwrap();
    let second = client.fetch_weather("London").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_client_from_config_uses_configured_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("appid", "cfg-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_key: Some("cfg-key".into()),
        base_url: Some(server.uri()),
        timeout_secs: Some(2),
    };

    let reading = WeatherClient::from_config(&config)
        .unwrap()
        .fetch_weather("London")
        .await
        .unwrap();

    assert_eq!(reading.temperature_c, 22);
}
