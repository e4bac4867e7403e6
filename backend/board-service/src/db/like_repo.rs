/// Like repository
///
/// The UNIQUE (user_id, post_id) constraint is the race-breaker: both insert
/// and delete report whether they touched a row, and the like service turns
/// "no row" into the corresponding client error.
use crate::models::Like;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Insert a like edge; returns false when the user already liked the post
pub async fn insert_like(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (id, user_id, post_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, post_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(post_id)
    .execute(tx.as_mut())
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete a like edge; returns false when there was nothing to delete
pub async fn delete_like(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(tx.as_mut())
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Check if a user has liked a post
pub async fn find_like(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Option<Like>, sqlx::Error> {
    sqlx::query_as::<_, Like>(
        r#"
        SELECT id, user_id, post_id, created_at
        FROM likes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await
}
