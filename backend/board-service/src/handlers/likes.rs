/// Like handlers - toggling likes and listing liked posts
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::LikeService;

/// Like a post. Liking twice is rejected, not ignored.
pub async fn like_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = LikeService::new((**pool).clone());
    service.like(user_id.0, *post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post liked."
    })))
}

/// Remove a like. Unliking a post that was never liked is rejected.
pub async fn unlike_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = LikeService::new((**pool).clone());
    service.unlike(user_id.0, *post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Like removed."
    })))
}

/// Posts the signed-in user has liked, most liked first
pub async fn list_liked_posts(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let service = LikeService::new((**pool).clone());
    let posts = service.liked_posts(user_id.0).await?;

    Ok(HttpResponse::Ok().json(posts))
}
