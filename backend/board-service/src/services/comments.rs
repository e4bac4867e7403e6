/// Comment service - comments under a post, with audited edits
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::comment_repo::{self, CommentPatch};
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentView};

use super::audit;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, post_id: Uuid, content: &str) -> Result<Comment> {
        self.require_post(post_id).await?;

        Ok(comment_repo::create_comment(&self.pool, user_id, post_id, content).await?)
    }

    /// Comments for one post, newest first, with author nicknames.
    pub async fn list(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        self.require_post(post_id).await?;

        Ok(comment_repo::list_by_post(&self.pool, post_id).await?)
    }

    /// Apply a partial edit, recording one history row per changed field.
    /// Only the author may edit.
    pub async fn update(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
        patch: &CommentPatch,
    ) -> Result<Comment> {
        self.require_comment_on(post_id, comment_id).await?;

        audit::apply_audited_update::<Comment>(&self.pool, comment_id, caller, patch).await
    }

    /// Only the author may delete.
    pub async fn delete(&self, post_id: Uuid, comment_id: Uuid, caller: Uuid) -> Result<()> {
        let comment = self.require_comment_on(post_id, comment_id).await?;

        if comment.user_id != caller {
            return Err(AppError::Forbidden);
        }

        comment_repo::delete_comment(&self.pool, comment_id).await?;

        Ok(())
    }

    async fn require_post(&self, post_id: Uuid) -> Result<()> {
        post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        Ok(())
    }

    /// A comment addressed under the wrong post is treated as missing.
    async fn require_comment_on(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment> {
        let comment = comment_repo::find_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

        if comment.post_id != post_id {
            return Err(AppError::NotFound("Comment".to_string()));
        }

        Ok(comment)
    }
}
