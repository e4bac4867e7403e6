/// Account handlers - sign-up, sign-in and the signed-in user's profile
use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::user_repo::ProfilePatch;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::Gender;
use crate::services::accounts::NewAccount;
use crate::services::{AccountService, SessionStore};

/// Register an account together with its profile.
pub async fn sign_up(
    pool: web::Data<PgPool>,
    payload: web::Json<SignUpRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let gender = parse_gender(&payload.gender)?;

    let service = AccountService::new((**pool).clone());
    service
        .sign_up(NewAccount {
            nickname: &payload.nickname,
            password: &payload.password,
            confirm_password: &payload.confirm_password,
            name: &payload.name,
            age: payload.age,
            gender,
            profile_image: payload.profile_image.as_deref(),
        })
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Sign-up completed."
    })))
}

/// Check credentials and start a session. The session token travels only in
/// an HttpOnly cookie, never in the response body.
pub async fn sign_in(
    pool: web::Data<PgPool>,
    store: web::Data<SessionStore>,
    payload: web::Json<SignInRequest>,
) -> Result<HttpResponse> {
    let service = AccountService::new((**pool).clone());
    let user = service.sign_in(&payload.nickname, &payload.password).await?;

    let session = store.create(user.id).await?;

    let cookie = Cookie::build(store.cookie_name().to_string(), session.token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(store.ttl().num_seconds()))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "message": "Signed in."
    })))
}

/// Profile of the signed-in user.
pub async fn get_profile(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let service = AccountService::new((**pool).clone());
    let profile = service.profile(user_id.0).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Partially update the signed-in user's profile.
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let gender = match payload.gender.as_deref() {
        Some(raw) => Some(parse_gender(raw)?),
        None => None,
    };

    let patch = ProfilePatch {
        name: payload.name.clone(),
        age: payload.age,
        gender,
        profile_image: payload.profile_image.clone(),
    };

    let service = AccountService::new((**pool).clone());
    let profile = service.update_profile(user_id.0, &patch).await?;

    Ok(HttpResponse::Ok().json(profile))
}

fn parse_gender(raw: &str) -> Result<Gender> {
    Gender::parse(raw)
        .ok_or_else(|| AppError::Validation("Gender must be MALE or FEMALE.".to_string()))
}

/// Request body for sign-up. Nickname and password rules run as an ordered
/// sequence in the account service, not as field annotations.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    pub nickname: String,

    pub password: String,

    pub confirm_password: String,

    #[validate(length(min = 1, max = 64))]
    pub name: String,

    #[validate(range(min = 0, max = 150))]
    pub age: i32,

    pub gender: String,

    pub profile_image: Option<String>,
}

/// Request body for sign-in
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub nickname: String,
    pub password: String,
}

/// Request body for profile updates. Unknown fields are rejected so a typo
/// can never silently drop an edit.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,

    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,

    pub gender: Option<String>,

    pub profile_image: Option<String>,
}
