// src/handlers/report.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::report::{CreateReportRequest, PlantHealthReport},
    utils::upload::{discard_file, store_file},
};

/// List plant-health reports, newest-created-first. Unauthenticated.
pub async fn list_reports(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let reports = sqlx::query_as::<_, PlantHealthReport>(
        r#"
        SELECT id, image, health, confidence, issue, recommendation, created_at
        FROM plant_health_reports
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list reports: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(reports))
}

/// Create a plant-health report from a multipart submission.
///
/// All text fields are validated before the image or the row is persisted,
/// so a rejected submission leaves no record behind.
pub async fn create_report(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut health = None;
    let mut confidence = None;
    let mut issue = None;
    let mut recommendation = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "health" => health = Some(field.text().await?),
            "confidence" => {
                let raw = field.text().await?;
                let parsed = raw.parse::<f64>().map_err(|_| {
                    AppError::BadRequest("confidence must be a number".to_string())
                })?;
                confidence = Some(parsed);
            }
            "issue" => issue = Some(field.text().await?),
            "recommendation" => recommendation = Some(field.text().await?),
            "image" => {
                let file_name = field.file_name().unwrap_or("plant").to_string();
                image = Some((file_name, field.bytes().await?.to_vec()));
            }
            _ => {}
        }
    }

    let payload = CreateReportRequest {
        health: health.ok_or_else(|| AppError::BadRequest("health is required".to_string()))?,
        confidence: confidence
            .ok_or_else(|| AppError::BadRequest("confidence is required".to_string()))?,
        issue: issue.ok_or_else(|| AppError::BadRequest("issue is required".to_string()))?,
        recommendation: recommendation
            .ok_or_else(|| AppError::BadRequest("recommendation is required".to_string()))?,
    };

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let (file_name, data) =
        image.ok_or_else(|| AppError::BadRequest("image file is required".to_string()))?;

    let image_path = store_file(&config.upload_dir, "plant_images", &file_name, &data).await?;

    let inserted = sqlx::query_as::<_, PlantHealthReport>(
        r#"
        INSERT INTO plant_health_reports (image, health, confidence, issue, recommendation, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id, image, health, confidence, issue, recommendation, created_at
        "#,
    )
    .bind(&image_path)
    .bind(&payload.health)
    .bind(payload.confidence)
    .bind(&payload.issue)
    .bind(&payload.recommendation)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await;

    let report = match inserted {
        Ok(report) => report,
        Err(e) => {
            discard_file(&config.upload_dir, &image_path).await;
            tracing::error!("Failed to create report: {:?}", e);
            return Err(AppError::InternalServerError(e.to_string()));
        }
    };

    Ok((StatusCode::CREATED, Json(report)))
}
