/// Comment repository
use crate::models::{Comment, CommentView};
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Optional comment fields for audited updates; None leaves a column untouched
#[derive(Debug, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
}

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, user_id, post_id, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, post_id, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(post_id)
    .bind(content)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a comment by ID
pub async fn find_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, post_id, content, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

/// List a post's comments with their author nickname, newest first
pub async fn list_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.user_id, u.nickname, c.post_id, c.content, c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Row-locked comment read for the audited update transaction
pub async fn comment_for_update(
    tx: &mut Transaction<'_, Postgres>,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, post_id, content, created_at, updated_at
        FROM comments
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(comment_id)
    .fetch_optional(tx.as_mut())
    .await
}

/// Apply a comment patch; absent fields keep their current value
pub async fn update_comment(
    tx: &mut Transaction<'_, Postgres>,
    comment_id: Uuid,
    patch: &CommentPatch,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET
            content = COALESCE($2, content),
            updated_at = $3
        WHERE id = $1
        RETURNING id, user_id, post_id, content, created_at, updated_at
        "#,
    )
    .bind(comment_id)
    .bind(patch.content.as_deref())
    .bind(Utc::now())
    .fetch_one(tx.as_mut())
    .await
}

/// Delete a comment; its history rows go with it via cascade
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(())
}
