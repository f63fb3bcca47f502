// src/models/article.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// The fixed article categories.
pub const CATEGORIES: [&str; 6] = [
    "crops",
    "vegetables",
    "pests",
    "diseases",
    "techniques",
    "seasonal",
];

/// Article row joined with the author's username, for listings.
#[derive(Debug, Serialize, FromRow)]
pub struct ArticleResponse {
    pub id: i64,
    pub category: String,
    pub user_id: i64,
    pub author_username: String,
    pub tags: String,
    pub date: chrono::NaiveDate,
    pub title: String,
    pub image: String,
    pub description: String,
    pub total_mins: i64,
    pub author_photo: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
}

/// DTO for creating a new article.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(custom(function = validate_category))]
    pub category: String,

    #[serde(default)]
    pub tags: String,

    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200 chars"))]
    pub title: String,

    #[validate(length(min = 1, max = 500))]
    pub image: String,

    #[validate(length(min = 1, max = 20000))]
    pub description: String,

    #[validate(range(min = 1, message = "total_mins must be positive"))]
    pub total_mins: i64,

    pub author_photo: Option<String>,
}

fn validate_category(category: &str) -> Result<(), validator::ValidationError> {
    if !CATEGORIES.contains(&category) {
        return Err(validator::ValidationError::new("unknown_category"));
    }
    Ok(())
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment must be between 1 and 2000 characters"
    ))]
    pub description: String,
}

/// DTO for displaying a comment with author info.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: i64,
    pub article_id: i64,
    pub user_id: i64,
    pub username: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
