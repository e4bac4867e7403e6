/// User repository - accounts, profiles and the sign-up writes
use crate::models::{Gender, ProfileView, User, UserProfile};
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

/// Optional profile fields for audited updates; None leaves a column untouched
#[derive(Debug, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub profile_image: Option<String>,
}

/// Find a user by nickname
pub async fn find_by_nickname(pool: &PgPool, nickname: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, nickname, password_hash, created_at, updated_at
        FROM users
        WHERE nickname = $1
        "#,
    )
    .bind(nickname)
    .fetch_optional(pool)
    .await
}

/// Check whether a nickname is already registered
pub async fn nickname_exists(pool: &PgPool, nickname: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE nickname = $1) AS taken")
        .bind(nickname)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<bool, _>("taken"))
}

/// Insert the account row; runs inside the sign-up transaction
pub async fn create_user(
    tx: &mut Transaction<'_, Postgres>,
    nickname: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, nickname, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, nickname, password_hash, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(nickname)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(tx.as_mut())
    .await
}

/// Insert the 1:1 profile row; runs inside the sign-up transaction
pub async fn create_profile(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
    age: i32,
    gender: Gender,
    profile_image: Option<&str>,
) -> Result<UserProfile, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id, name, age, gender, profile_image, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING user_id, name, age, gender, profile_image, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(age)
    .bind(gender)
    .bind(profile_image)
    .bind(now)
    .bind(now)
    .fetch_one(tx.as_mut())
    .await
}

/// Account joined with its profile, for GET /api/users
pub async fn find_profile_view(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ProfileView>, sqlx::Error> {
    sqlx::query_as::<_, ProfileView>(
        r#"
        SELECT u.id AS user_id, u.nickname, p.name, p.age, p.gender, p.profile_image,
               p.created_at, p.updated_at
        FROM users u
        JOIN user_profiles p ON p.user_id = u.id
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Row-locked profile read for the audited update transaction
pub async fn profile_for_update(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, name, age, gender, profile_image, created_at, updated_at
        FROM user_profiles
        WHERE user_id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(tx.as_mut())
    .await
}

/// Apply a profile patch; absent fields keep their current value
pub async fn update_profile(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    patch: &ProfilePatch,
) -> Result<UserProfile, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE user_profiles
        SET
            name = COALESCE($2, name),
            age = COALESCE($3, age),
            gender = COALESCE($4, gender),
            profile_image = COALESCE($5, profile_image),
            updated_at = $6
        WHERE user_id = $1
        RETURNING user_id, name, age, gender, profile_image, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(patch.name.as_deref())
    .bind(patch.age)
    .bind(patch.gender)
    .bind(patch.profile_image.as_deref())
    .bind(Utc::now())
    .fetch_one(tx.as_mut())
    .await
}
