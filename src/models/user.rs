// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// Kind of account holder (e.g. 'farmer', 'expert', 'vendor').
    pub individual_type: String,

    /// Stored path of the uploaded identity-proof file.
    pub id_proof: String,

    /// Free-text city name used for weather lookups. May be empty.
    pub location: String,

    /// Disabled accounts cannot log in or use an existing token.
    pub is_active: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Text fields of a registration request. The id_proof file arrives as a
/// separate multipart part and is checked by the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters."),
        custom(function = validate_password_strength)
    )]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "individual_type is required."))]
    pub individual_type: String,

    /// Optional at registration; weather lookups fail until it is set.
    pub location: String,
}

/// Rejects entirely-numeric passwords.
fn validate_password_strength(password: &str) -> Result<(), validator::ValidationError> {
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(validator::ValidationError::new("password_entirely_numeric"));
    }
    Ok(())
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Login response: the bearer token plus the stored location so clients can
/// personalize without a second round trip.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub location: String,
}
