/// Account service - registration and credential checks
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo::{self, ProfilePatch};
use crate::error::{AppError, Result};
use crate::models::{Gender, ProfileView, User, UserProfile};
use crate::security;
use crate::validators;

use super::audit;

pub struct AccountService {
    pool: PgPool,
}

/// Sign-up input after HTTP-level parsing
#[derive(Debug)]
pub struct NewAccount<'a> {
    pub nickname: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub name: &'a str,
    pub age: i32,
    pub gender: Gender,
    pub profile_image: Option<&'a str>,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account together with its profile.
    ///
    /// The ordered checks run first; the duplicate-nickname lookup is the
    /// last check before any write. Account and profile rows are inserted in
    /// one transaction, and a duplicate slipping in between the lookup and
    /// the insert surfaces as the same duplicate-nickname failure via the
    /// unique constraint.
    pub async fn sign_up(&self, account: NewAccount<'_>) -> Result<(User, UserProfile)> {
        validators::validate_registration(
            account.nickname,
            account.password,
            account.confirm_password,
        )?;

        if user_repo::nickname_exists(&self.pool, account.nickname).await? {
            return Err(duplicate_nickname());
        }

        let password_hash = security::hash_password(account.password)?;

        let mut tx = self.pool.begin().await?;

        let user = user_repo::create_user(&mut tx, account.nickname, &password_hash)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(ref e) if e.is_unique_violation() => duplicate_nickname(),
                other => other.into(),
            })?;
        let profile = user_repo::create_profile(
            &mut tx,
            user.id,
            account.name,
            account.age,
            account.gender,
            account.profile_image,
        )
        .await?;

        tx.commit().await?;

        Ok((user, profile))
    }

    /// Check credentials for sign-in.
    ///
    /// Unknown nickname and wrong password are indistinguishable to the
    /// caller.
    pub async fn sign_in(&self, nickname: &str, password: &str) -> Result<User> {
        let user = user_repo::find_by_nickname(&self.pool, nickname)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !security::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<ProfileView> {
        user_repo::find_profile_view(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile".to_string()))
    }

    /// Apply a partial profile update, recording one history row per
    /// changed field.
    pub async fn update_profile(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<UserProfile> {
        audit::apply_audited_update::<UserProfile>(&self.pool, user_id, user_id, patch).await
    }
}

fn duplicate_nickname() -> AppError {
    AppError::Validation("Nickname is already in use.".to_string())
}
