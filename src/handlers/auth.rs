// src/handlers/auth.rs

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
    models::user::{LoginRequest, LoginResponse, RegisterRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        token::get_or_create_token,
        upload::{discard_file, store_file},
    },
};

/// Registers a new user.
///
/// The body is multipart because registration requires an identity-proof
/// file. Text fields are collected first, validated as a whole, and only
/// then is anything persisted (file, then row). The password is hashed with
/// Argon2 before storage and never logged.
/// Returns 201 Created and the user object (excluding the password hash).
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut username = None;
    let mut email = None;
    let mut password = None;
    let mut individual_type = None;
    let mut location = None;
    let mut id_proof: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "username" => username = Some(field.text().await?),
            "email" => email = Some(field.text().await?),
            "password" => password = Some(field.text().await?),
            "individual_type" => individual_type = Some(field.text().await?),
            "location" => location = Some(field.text().await?),
            "id_proof" => {
                let file_name = field.file_name().unwrap_or("id_proof").to_string();
                id_proof = Some((file_name, field.bytes().await?.to_vec()));
            }
            _ => {}
        }
    }

    let payload = RegisterRequest {
        username: username.ok_or_else(|| AppError::BadRequest("username is required".to_string()))?,
        email: email.ok_or_else(|| AppError::BadRequest("email is required".to_string()))?,
        password: password.ok_or_else(|| AppError::BadRequest("password is required".to_string()))?,
        individual_type: individual_type
            .ok_or_else(|| AppError::BadRequest("individual_type is required".to_string()))?,
        location: location.unwrap_or_default(),
    };

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let (file_name, data) =
        id_proof.ok_or_else(|| AppError::BadRequest("id_proof file is required".to_string()))?;

    let hashed_password = hash_password(&payload.password)?;
    let id_proof_path = store_file(&config.upload_dir, "id_proofs", &file_name, &data).await?;

    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, individual_type, id_proof, location, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)
        RETURNING id, username, email, password, individual_type, id_proof, location, is_active, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed_password)
    .bind(&payload.individual_type)
    .bind(&id_proof_path)
    .bind(&payload.location)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await;

    let user = match inserted {
        Ok(user) => user,
        Err(e) => {
            // The row never landed; the file stored for it must not linger.
            discard_file(&config.upload_dir, &id_proof_path).await;
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                return Err(AppError::BadRequest(
                    "A user with that username or email already exists".to_string(),
                ));
            }
            tracing::error!("Failed to register user: {:?}", e);
            return Err(AppError::from(e));
        }
    };

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns the opaque bearer token together with
/// the user's stored location (so clients can personalize immediately).
///
/// The token is get-or-created atomically: repeated logins while a token is
/// live return the same key.
pub async fn login(
    State(pool): State<SqlitePool>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, individual_type, id_proof, location, is_active, created_at
        FROM users
        WHERE username = ?1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    // Same response for unknown user, disabled account, and wrong password.
    let user = user
        .filter(|u| u.is_active)
        .ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = get_or_create_token(&pool, user.id).await?;

    Ok(Json(LoginResponse {
        token,
        location: user.location,
    }))
}
