// src/handlers/article.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        article::{ArticleResponse, CommentResponse, CreateArticleRequest, CreateCommentRequest},
        user::User,
    },
    utils::text::{clean_text, normalize_tags},
};

/// List articles (recent first), each joined with the author's username and
/// its like/comment counts.
pub async fn list_articles(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let articles = sqlx::query_as::<_, ArticleResponse>(
        r#"
        SELECT
            a.id, a.category, a.user_id, u.username AS author_username,
            a.tags, a.date, a.title, a.image, a.description, a.total_mins,
            a.author_photo,
            (SELECT COUNT(*) FROM likes l WHERE l.article_id = a.id) AS likes_count,
            (SELECT COUNT(*) FROM comments c WHERE c.article_id = a.id) AS comments_count
        FROM articles a
        JOIN users u ON a.user_id = u.id
        ORDER BY a.created_at DESC, a.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list articles: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(articles))
}

/// Create a new article. Requires login.
///
/// The description is sanitized before storage; tags are normalized to a
/// clean comma-separated form.
pub async fn create_article(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let now = chrono::Utc::now();
    let article_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO articles (category, user_id, tags, date, title, image, description, total_mins, author_photo, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        RETURNING id
        "#,
    )
    .bind(&payload.category)
    .bind(user.id)
    .bind(normalize_tags(&payload.tags))
    .bind(now.date_naive())
    .bind(&payload.title)
    .bind(&payload.image)
    .bind(clean_text(&payload.description))
    .bind(payload.total_mins)
    .bind(&payload.author_photo)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create article: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": article_id })),
    ))
}

/// List all comments on an article, oldest first, with author usernames.
pub async fn list_comments(
    State(pool): State<SqlitePool>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let comments = sqlx::query_as::<_, CommentResponse>(
        r#"
        SELECT c.id, c.article_id, c.user_id, u.username, c.description, c.created_at
        FROM comments c
        JOIN users u ON c.user_id = u.id
        WHERE c.article_id = ?1
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(comments))
}

/// Create a comment on an article. Requires login.
pub async fn create_comment(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<User>,
    Path(article_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    ensure_article_exists(&pool, article_id).await?;

    let comment_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO comments (user_id, article_id, description, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id
        "#,
    )
    .bind(user.id)
    .bind(article_id)
    .bind(clean_text(&payload.description))
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": comment_id })),
    ))
}

/// Like an article. Requires login.
/// One like per (user, article); a second like returns 409 Conflict.
pub async fn like_article(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<User>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_article_exists(&pool, article_id).await?;

    sqlx::query("INSERT INTO likes (user_id, article_id, created_at) VALUES (?1, ?2, ?3)")
        .bind(user.id)
        .bind(article_id)
        .bind(chrono::Utc::now())
        .execute(&pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                AppError::Conflict("Already liked".to_string())
            } else {
                AppError::InternalServerError(e.to_string())
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "liked": true })),
    ))
}

async fn ensure_article_exists(pool: &SqlitePool, article_id: i64) -> Result<(), AppError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM articles WHERE id = ?1")
        .bind(article_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Article not found".to_string()))?;
    Ok(())
}
