// src/models/report.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'plant_health_reports' table in the database.
/// Reports carry no user ownership; uploads are anonymous.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlantHealthReport {
    pub id: i64,

    /// Stored path of the uploaded plant image.
    pub image: String,

    /// Classification label (e.g. "Healthy", "Leaf Blight").
    pub health: String,

    /// Classifier confidence in percent.
    pub confidence: f64,

    pub issue: String,
    pub recommendation: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Text fields of a report submission; the image arrives as a separate
/// multipart part.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 100, message = "health is required."))]
    pub health: String,

    #[validate(range(min = 0.0, max = 100.0, message = "confidence must be within 0-100."))]
    pub confidence: f64,

    pub issue: String,
    pub recommendation: String,
}
