// src/handlers/scheme.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::scheme::{CreateSchemeRequest, Scheme},
    utils::text::normalize_tags,
};

/// List schemes, newest-id-first. Unauthenticated.
pub async fn list_schemes(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let schemes = sqlx::query_as::<_, Scheme>(
        r#"
        SELECT id, title, provider, description, eligibility, benefits, deadline, tags, website, created_at
        FROM schemes
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list schemes: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(schemes))
}

/// Create a scheme entry. Presence/type validation only, plus URL shape for
/// the website link.
pub async fn create_scheme(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateSchemeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let scheme = sqlx::query_as::<_, Scheme>(
        r#"
        INSERT INTO schemes (title, provider, description, eligibility, benefits, deadline, tags, website, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        RETURNING id, title, provider, description, eligibility, benefits, deadline, tags, website, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.provider)
    .bind(&payload.description)
    .bind(&payload.eligibility)
    .bind(&payload.benefits)
    .bind(&payload.deadline)
    .bind(normalize_tags(&payload.tags))
    .bind(&payload.website)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create scheme: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(scheme)))
}
