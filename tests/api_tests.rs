// tests/api_tests.rs

use agroassist::{config::Config, routes, state::AppState};
use axum::{Json, Router, http::StatusCode, routing::get};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the app's
/// upload directory.
///
/// Each test gets its own in-memory SQLite database (single-connection pool
/// so the database lives for the whole test) and its own temp upload dir.
async fn spawn_app(weather_api_url: &str) -> (String, std::path::PathBuf) {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options)
        .await
        .expect("Failed to open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let upload_dir = std::env::temp_dir().join(format!(
        "agroassist-test-{}",
        uuid::Uuid::new_v4().simple()
    ));
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .expect("Failed to create temp upload dir");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        weather_api_url: weather_api_url.to_string(),
        weather_api_key: "test_api_key".to_string(),
        upload_dir: upload_dir.to_string_lossy().to_string(),
    };

    let state = AppState {
        pool,
        config,
        http: reqwest::Client::new(),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, upload_dir)
}

/// Spawns a stub weather upstream returning a fixed payload, or a fixed
/// error status when `fail` is set.
async fn spawn_weather_stub(fail: bool) -> String {
    let app = if fail {
        Router::new().route(
            "/data/2.5/weather",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
    } else {
        Router::new().route(
            "/data/2.5/weather",
            get(|| async { Json(serde_json::json!({"main": {"temp": 21}})) }),
        )
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/data/2.5/weather", addr)
}

fn registration_form(username: &str, location: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("username", username.to_string())
        .text("email", format!("{}@example.com", username))
        .text("password", "greenfields1".to_string())
        .text("individual_type", "farmer".to_string())
        .text("location", location.to_string())
        .part(
            "id_proof",
            reqwest::multipart::Part::bytes(b"dummy id proof".to_vec()).file_name("id.pdf"),
        )
}

async fn register(client: &reqwest::Client, address: &str, username: &str, location: &str) {
    let response = client
        .post(format!("{}/register/", address))
        .multipart(registration_form(username, location))
        .send()
        .await
        .expect("Register request failed");
    assert_eq!(response.status().as_u16(), 201);
}

async fn login(client: &reqwest::Client, address: &str, username: &str) -> serde_json::Value {
    client
        .post(format!("{}/login/", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "greenfields1"
        }))
        .send()
        .await
        .expect("Login request failed")
        .json()
        .await
        .expect("Failed to parse login json")
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works_and_hides_password() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register/", address))
        .multipart(registration_form("ramesh", "Pune"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], "ramesh");
    assert_eq!(body["location"], "Pune");
    assert!(body.get("password").is_none(), "password must not be serialized");
}

#[tokio::test]
async fn register_duplicate_username_fails() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    register(&client, &address, "sita", "Nashik").await;

    let response = client
        .post(format!("{}/register/", address))
        .multipart(registration_form("sita", "Nagpur"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);

    // The first record persists unchanged: login still returns its location.
    let login_body = login(&client, &address, "sita").await;
    assert_eq!(login_body["location"], "Nashik");
}

#[tokio::test]
async fn duplicate_registration_leaves_no_stored_id_proof() {
    let (address, upload_dir) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    register(&client, &address, "orphan", "Pune").await;

    let response = client
        .post(format!("{}/register/", address))
        .multipart(registration_form("orphan", "Nagpur"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    // Only the accepted registration may leave a file behind.
    let mut entries = tokio::fs::read_dir(upload_dir.join("id_proofs"))
        .await
        .expect("id_proofs dir should exist");
    let mut stored = 0;
    while entries.next_entry().await.unwrap().is_some() {
        stored += 1;
    }
    assert_eq!(stored, 1, "one registered user, one stored id_proof file");
}

#[tokio::test]
async fn register_requires_id_proof_file() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new()
        .text("username", "noproof")
        .text("email", "noproof@example.com")
        .text("password", "greenfields1")
        .text("individual_type", "farmer")
        .text("location", "Pune");

    let response = client
        .post(format!("{}/register/", address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_rejects_numeric_password() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new()
        .text("username", "digits")
        .text("email", "digits@example.com")
        .text("password", "12345678")
        .text("individual_type", "farmer")
        .text("location", "Pune")
        .part(
            "id_proof",
            reqwest::multipart::Part::bytes(b"x".to_vec()).file_name("id.pdf"),
        );

    let response = client
        .post(format!("{}/register/", address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn login_returns_same_token_on_repeat() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    register(&client, &address, "tokenuser", "Indore").await;

    let first = login(&client, &address, "tokenuser").await;
    let second = login(&client, &address, "tokenuser").await;

    let token = first["token"].as_str().expect("Token not found");
    assert!(!token.is_empty());
    assert_eq!(first["token"], second["token"], "token must be idempotent");
    assert_eq!(first["location"], "Indore");
}

#[tokio::test]
async fn login_wrong_password_never_returns_token() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    register(&client, &address, "careful", "Pune").await;

    for _ in 0..2 {
        let response = client
            .post(format!("{}/login/", address))
            .json(&serde_json::json!({
                "username": "careful",
                "password": "wrong-password"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status().as_u16(), 401);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body.get("token").is_none());
        assert!(body.get("error").is_some());
    }
}

#[tokio::test]
async fn weather_requires_token() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/weather/", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn weather_without_location_is_bad_request() {
    // Upstream URL is unroutable; a 400 here proves no upstream call happened.
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    register(&client, &address, "nowhere", "").await;
    let token = login(&client, &address, "nowhere").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .get(format!("{}/weather/", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn weather_relays_upstream_payload_verbatim() {
    let stub_url = spawn_weather_stub(false).await;
    let (address, _) = spawn_app(&stub_url).await;
    let client = reqwest::Client::new();

    register(&client, &address, "sunseeker", "Pune").await;
    let token = login(&client, &address, "sunseeker").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .get(format!("{}/weather/", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"main": {"temp": 21}}));
}

#[tokio::test]
async fn weather_upstream_failure_maps_to_500() {
    let stub_url = spawn_weather_stub(true).await;
    let (address, _) = spawn_app(&stub_url).await;
    let client = reqwest::Client::new();

    register(&client, &address, "stormy", "Pune").await;
    let token = login(&client, &address, "stormy").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .get(format!("{}/weather/", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn stale_token_is_rejected() {
    let (address, _) = spawn_app("http://127.0.0.1:1/unused").await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/weather/", address))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}
