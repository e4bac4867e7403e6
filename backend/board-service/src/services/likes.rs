/// Like service
///
/// Both directions run in one transaction: the edge write and the counter
/// delta commit together or not at all, so the counter always equals the
/// number of live edges. The counter is moved with atomic SQL deltas, never
/// read-modify-write.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{like_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::PostView;

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Like a post.
    ///
    /// The unique (user_id, post_id) constraint breaks concurrent double
    /// likes: the insert that finds the edge already present reports zero
    /// rows and the whole transaction rolls back untouched.
    pub async fn like(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let mut tx = self.pool.begin().await?;

        if !like_repo::insert_like(&mut tx, user_id, post_id).await? {
            return Err(AppError::AlreadyLiked);
        }
        post_repo::increment_like_count(&mut tx, post_id).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Remove a like from a post.
    ///
    /// Without an edge to delete the counter stays untouched.
    pub async fn unlike(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if !like_repo::delete_like(&mut tx, user_id, post_id).await? {
            return Err(AppError::NotYetLiked);
        }
        post_repo::decrement_like_count(&mut tx, post_id).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Posts the user has liked, most liked first.
    pub async fn liked_posts(&self, user_id: Uuid) -> Result<Vec<PostView>> {
        Ok(post_repo::list_liked_posts(&self.pool, user_id).await?)
    }
}
