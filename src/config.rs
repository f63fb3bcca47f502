// src/config.rs

use dotenvy::dotenv;
use std::env;

const DEFAULT_WEATHER_API_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,

    /// Base URL of the upstream weather service. Overridable so tests can
    /// point it at a local stub.
    pub weather_api_url: String,
    pub weather_api_key: String,

    /// Directory where uploaded files (id proofs, report images) land.
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let weather_api_key = env::var("WEATHER_API_KEY").expect("WEATHER_API_KEY must be set");

        let weather_api_url =
            env::var("WEATHER_API_URL").unwrap_or_else(|_| DEFAULT_WEATHER_API_URL.to_string());

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            rust_log,
            weather_api_url,
            weather_api_key,
            upload_dir,
        }
    }
}
