/// Post service - board post creation, listing and audited edits
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::post_repo::{self, PostPatch};
use crate::error::{AppError, Result};
use crate::models::{Post, PostView};

use super::audit;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, title: &str, content: &str) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, user_id, title, content).await?)
    }

    /// All posts, newest first, with author nicknames joined in.
    pub async fn list(&self) -> Result<Vec<PostView>> {
        Ok(post_repo::list_posts(&self.pool).await?)
    }

    pub async fn detail(&self, post_id: Uuid) -> Result<PostView> {
        post_repo::find_view_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))
    }

    /// Apply a partial edit, recording one history row per changed field.
    /// Only the author may edit.
    pub async fn update(&self, post_id: Uuid, caller: Uuid, patch: &PostPatch) -> Result<Post> {
        audit::apply_audited_update::<Post>(&self.pool, post_id, caller, patch).await
    }

    /// Delete a post and, through the schema, its comments, likes and
    /// history. Only the author may delete.
    pub async fn delete(&self, post_id: Uuid, caller: Uuid) -> Result<()> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        if post.user_id != caller {
            return Err(AppError::Forbidden);
        }

        post_repo::delete_post(&self.pool, post_id).await?;

        Ok(())
    }
}
