/// Post handlers - HTTP endpoints for board posts
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::post_repo::PostPatch;
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::PostService;

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let service = PostService::new((**pool).clone());
    let post = service
        .create(user_id.0, &payload.title, &payload.content)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// List all posts, newest first
pub async fn list_posts(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let posts = service.list().await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Get a single post
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.detail(*post_id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Update a post's title or content; author only
pub async fn update_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let patch = PostPatch {
        title: payload.title.clone(),
        content: payload.content.clone(),
    };

    let service = PostService::new((**pool).clone());
    let post = service.update(*post_id, user_id.0, &patch).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post; author only
pub async fn delete_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.delete(*post_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post deleted."
    })))
}

/// Request body for creating a post
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// Request body for updating a post. Unknown fields are rejected so a typo
/// can never silently drop an edit.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,
}
