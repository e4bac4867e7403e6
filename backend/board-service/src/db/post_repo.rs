/// Post repository
use crate::models::{Post, PostView};
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Optional post fields for audited updates; None leaves a column untouched
#[derive(Debug, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Create a new post with a zero like counter
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, user_id, title, content, like_count, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 0, $5, $6)
        RETURNING id, user_id, title, content, like_count, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a post by ID
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, content, like_count, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// List all posts with their author nickname, newest first
pub async fn list_posts(pool: &PgPool) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.user_id, u.nickname, p.title, p.content, p.like_count,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Single post with its author nickname
pub async fn find_view_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.user_id, u.nickname, p.title, p.content, p.like_count,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Posts the user has liked, most liked first
pub async fn list_liked_posts(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.user_id, u.nickname, p.title, p.content, p.like_count,
               p.created_at, p.updated_at
        FROM likes l
        JOIN posts p ON p.id = l.post_id
        JOIN users u ON u.id = p.user_id
        WHERE l.user_id = $1
        ORDER BY p.like_count DESC, p.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Row-locked post read for the audited update transaction
pub async fn post_for_update(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, content, like_count, created_at, updated_at
        FROM posts
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(post_id)
    .fetch_optional(tx.as_mut())
    .await
}

/// Apply a post patch; absent fields keep their current value
pub async fn update_post(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    patch: &PostPatch,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET
            title = COALESCE($2, title),
            content = COALESCE($3, content),
            updated_at = $4
        WHERE id = $1
        RETURNING id, user_id, title, content, like_count, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(patch.title.as_deref())
    .bind(patch.content.as_deref())
    .bind(Utc::now())
    .fetch_one(tx.as_mut())
    .await
}

/// Delete a post; comments, likes and history rows go with it via cascade
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Increment the like counter; runs inside the like transaction
pub async fn increment_like_count(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET like_count = like_count + 1, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}

/// Decrement the like counter, clamped at zero; runs inside the unlike transaction
pub async fn decrement_like_count(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET like_count = GREATEST(like_count - 1, 0), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}
