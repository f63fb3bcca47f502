// src/models/scheme.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

/// Represents the 'schemes' table in the database.
/// Government/NGO support programmes; no ownership relation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Scheme {
    pub id: i64,
    pub title: String,

    /// Issuing body (e.g. "central", "state", "ngo").
    pub provider: String,

    pub description: String,
    pub eligibility: String,
    pub benefits: String,

    /// Application deadline as an ISO date string, if any.
    pub deadline: Option<String>,

    /// Comma-separated tags.
    pub tags: String,

    pub website: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new scheme entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSchemeRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub provider: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    #[validate(length(min = 1, max = 5000))]
    pub eligibility: String,
    #[validate(length(min = 1, max = 5000))]
    pub benefits: String,
    pub deadline: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[validate(custom(function = validate_optional_url))]
    pub website: Option<String>,
}

/// Validates that a website link, when present, is a correctly formatted URL.
fn validate_optional_url(website: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(website).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
