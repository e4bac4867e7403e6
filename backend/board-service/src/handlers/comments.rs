/// Comment handlers - HTTP endpoints under /posts/{post_id}/comments
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::comment_repo::CommentPatch;
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::CommentService;

/// Create a comment on a post
pub async fn create_comment(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let service = CommentService::new((**pool).clone());
    let comment = service.create(user_id.0, *post_id, &payload.content).await?;

    Ok(HttpResponse::Created().json(comment))
}

/// List comments for a post, newest first
pub async fn list_comments(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    let comments = service.list(*post_id).await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Update a comment's content; author only
pub async fn update_comment(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    user_id: UserId,
    payload: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let (post_id, comment_id) = path.into_inner();
    let patch = CommentPatch {
        content: payload.content.clone(),
    };

    let service = CommentService::new((**pool).clone());
    let comment = service.update(post_id, comment_id, user_id.0, &patch).await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment; author only
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let service = CommentService::new((**pool).clone());
    service.delete(post_id, comment_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment deleted."
    })))
}

/// Request body for creating a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Request body for updating a comment. Unknown fields are rejected so a
/// typo can never silently drop an edit.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1))]
    pub content: Option<String>,
}
