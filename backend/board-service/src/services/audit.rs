/// Diff-and-audit engine
///
/// One unit of work shared by profile, post and comment updates: re-read the
/// row under a lock, check ownership, diff the patch against the fresh row,
/// apply the typed UPDATE and append one history row per changed field, all
/// inside a single transaction.
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::fmt::Display;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo, user_repo};
use crate::db::{comment_repo::CommentPatch, post_repo::PostPatch, user_repo::ProfilePatch};
use crate::error::{AppError, Result};
use crate::models::{Comment, Post, UserProfile};

/// One changed field staged for the history table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: String,
    pub new_value: String,
}

/// A resource whose edits are recorded field-by-field in a history table.
///
/// The patch type is a plain struct of optional fields, so the set of
/// columns an update can ever touch is fixed at compile time.
#[async_trait]
pub trait AuditedResource: Sized + Send {
    type Patch: Send + Sync;

    /// History table receiving one row per changed field.
    const HISTORY_TABLE: &'static str;
    /// Column in the history table referencing the resource.
    const HISTORY_FK: &'static str;
    /// Resource name used in not-found messages.
    const RESOURCE: &'static str;

    fn owner_id(&self) -> Uuid;

    /// Pure diff of the patch against this row, over canonical string values.
    /// A field that is present but unchanged stages nothing.
    fn stage_changes(&self, patch: &Self::Patch) -> Vec<FieldChange>;

    /// Row-locked read inside the update transaction.
    async fn fetch_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Self>>;

    /// Typed UPDATE applying the patch; absent fields keep their value.
    async fn apply_patch(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        patch: &Self::Patch,
    ) -> Result<Self>;
}

/// Apply a patch to one resource together with its audit trail, atomically.
///
/// The row is re-read with FOR UPDATE so the diff can never be computed
/// against a stale snapshot under concurrent writers. Any failure rolls the
/// whole unit back: no partial update, no orphan audit rows.
pub async fn apply_audited_update<R: AuditedResource>(
    pool: &sqlx::PgPool,
    id: Uuid,
    caller: Uuid,
    patch: &R::Patch,
) -> Result<R> {
    let mut tx = pool.begin().await?;

    let current = R::fetch_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(R::RESOURCE.to_string()))?;

    if current.owner_id() != caller {
        return Err(AppError::Forbidden);
    }

    let changes = current.stage_changes(patch);
    let updated = R::apply_patch(&mut tx, id, patch).await?;

    for change in &changes {
        insert_history::<R>(&mut tx, id, change).await?;
    }

    tx.commit().await?;

    Ok(updated)
}

/// Append one audit row. The table and FK column come from trait constants;
/// all values are bound.
async fn insert_history<R: AuditedResource>(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    change: &FieldChange,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (id, {}, field, old_value, new_value, created_at) \
         VALUES ($1, $2, $3, $4, $5, NOW())",
        R::HISTORY_TABLE,
        R::HISTORY_FK,
    );

    sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(change.field)
        .bind(&change.old_value)
        .bind(&change.new_value)
        .execute(tx.as_mut())
        .await?;

    Ok(())
}

/// Stage a change for a non-null column when the patch carries a new value.
fn stage<T>(changes: &mut Vec<FieldChange>, field: &'static str, current: &T, patched: &Option<T>)
where
    T: Display + PartialEq,
{
    if let Some(next) = patched {
        if next != current {
            changes.push(FieldChange {
                field,
                old_value: current.to_string(),
                new_value: next.to_string(),
            });
        }
    }
}

/// Stage a change for a nullable column. An absent current value is recorded
/// with the canonical literal "null".
fn stage_nullable<T>(
    changes: &mut Vec<FieldChange>,
    field: &'static str,
    current: &Option<T>,
    patched: &Option<T>,
) where
    T: Display + PartialEq,
{
    if let Some(next) = patched {
        if current.as_ref() != Some(next) {
            changes.push(FieldChange {
                field,
                old_value: canonical_nullable(current),
                new_value: next.to_string(),
            });
        }
    }
}

fn canonical_nullable<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

#[async_trait]
impl AuditedResource for UserProfile {
    type Patch = ProfilePatch;

    const HISTORY_TABLE: &'static str = "user_histories";
    const HISTORY_FK: &'static str = "user_id";
    const RESOURCE: &'static str = "Profile";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn stage_changes(&self, patch: &ProfilePatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        stage(&mut changes, "name", &self.name, &patch.name);
        stage(&mut changes, "age", &self.age, &patch.age);
        stage(&mut changes, "gender", &self.gender, &patch.gender);
        stage_nullable(
            &mut changes,
            "profile_image",
            &self.profile_image,
            &patch.profile_image,
        );
        changes
    }

    async fn fetch_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Self>> {
        Ok(user_repo::profile_for_update(tx, id).await?)
    }

    async fn apply_patch(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<Self> {
        Ok(user_repo::update_profile(tx, id, patch).await?)
    }
}

#[async_trait]
impl AuditedResource for Post {
    type Patch = PostPatch;

    const HISTORY_TABLE: &'static str = "post_histories";
    const HISTORY_FK: &'static str = "post_id";
    const RESOURCE: &'static str = "Post";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn stage_changes(&self, patch: &PostPatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        stage(&mut changes, "title", &self.title, &patch.title);
        stage(&mut changes, "content", &self.content, &patch.content);
        changes
    }

    async fn fetch_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Self>> {
        Ok(post_repo::post_for_update(tx, id).await?)
    }

    async fn apply_patch(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        patch: &PostPatch,
    ) -> Result<Self> {
        Ok(post_repo::update_post(tx, id, patch).await?)
    }
}

#[async_trait]
impl AuditedResource for Comment {
    type Patch = CommentPatch;

    const HISTORY_TABLE: &'static str = "comment_histories";
    const HISTORY_FK: &'static str = "comment_id";
    const RESOURCE: &'static str = "Comment";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn stage_changes(&self, patch: &CommentPatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        stage(&mut changes, "content", &self.content, &patch.content);
        changes
    }

    async fn fetch_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Self>> {
        Ok(comment_repo::comment_for_update(tx, id).await?)
    }

    async fn apply_patch(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        patch: &CommentPatch,
    ) -> Result<Self> {
        Ok(comment_repo::update_comment(tx, id, patch).await?)
    }
}
