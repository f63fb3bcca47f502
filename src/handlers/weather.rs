// src/handlers/weather.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{config::Config, error::AppError, models::user::User};

/// Proxies the upstream weather service for the authenticated user.
///
/// Reads the user's stored location and issues a single outbound GET for
/// current conditions in metric units. The upstream JSON is relayed
/// verbatim; there is no caching, retry, or reshaping. Upstream failures
/// surface as 500 with the underlying error text.
pub async fn get_weather(
    State(config): State<Config>,
    State(http): State<reqwest::Client>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let city = user.location.trim();
    if city.is_empty() {
        return Err(AppError::BadRequest("Location not set for user".to_string()));
    }

    let response = http
        .get(&config.weather_api_url)
        .query(&[
            ("q", city),
            ("appid", config.weather_api_key.as_str()),
            ("units", "metric"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "weather upstream returned {}: {}",
            status, body
        )));
    }

    let payload: serde_json::Value = response.json().await?;
    Ok(Json(payload))
}
