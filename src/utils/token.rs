// src/utils/token.rs
//
// Opaque bearer tokens, stored server-side. A token is a random key bound
// 1:1 to a user; login get-or-creates it, and every protected request
// resolves it back to the owning user with a single lookup. Tokens carry no
// expiry and there is no revoke endpoint.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{error::AppError, models::user::User, state::AppState};

/// Generates a fresh opaque token key (32 hex chars).
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the user's live token, creating one if none exists.
///
/// The upsert is a single statement so two concurrent logins cannot mint two
/// different tokens for the same user: the loser of the race hits the
/// `user_id` unique constraint and the no-op update returns the stored key.
pub async fn get_or_create_token(pool: &SqlitePool, user_id: i64) -> Result<String, AppError> {
    let (token,): (String,) = sqlx::query_as(
        r#"
        INSERT INTO auth_tokens (user_id, token, created_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(user_id) DO UPDATE SET user_id = excluded.user_id
        RETURNING token
        "#,
    )
    .bind(user_id)
    .bind(generate_token())
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(token)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header
/// against the auth_tokens table. If valid, injects the owning `User` into
/// the request extensions for handlers to use. If absent, malformed, or
/// unknown, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Err(AppError::AuthError("Authentication required".to_string())),
    };

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.password, u.individual_type,
               u.id_proof, u.location, u.is_active, u.created_at
        FROM users u
        JOIN auth_tokens t ON t.user_id = u.id
        WHERE t.token = ?1
        "#,
    )
    .bind(token)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::AuthError("Invalid token".to_string()))?;

    if !user.is_active {
        return Err(AppError::AuthError("Account disabled".to_string()));
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
