#![allow(dead_code)]
//! Shared fixtures for database-backed API tests.
//!
//! Tests run against the database named by DATABASE_URL and skip with a
//! notice when none is reachable. Fixtures never truncate tables; every
//! account gets a unique nickname so test data cannot collide.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use board_service::models::Gender;
use board_service::services::accounts::NewAccount;
use board_service::services::{AccountService, SessionStore};

pub const COOKIE_NAME: &str = "board_sid";
pub const PASSWORD: &str = "pass1234";

/// Connect to the test database and bring the schema up to date.
/// Returns None when DATABASE_URL is unset or unreachable so the caller can
/// skip the test.
pub async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping database-backed test");
            return None;
        }
    };

    let pool = match PgPoolOptions::new().max_connections(5).connect(&url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to test database: {}; skipping", e);
            return None;
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        eprintln!("Failed to run migrations: {}; skipping", e);
        return None;
    }

    Some(pool)
}

/// Store configured exactly like the one the server builds, with a short
/// test TTL.
pub fn session_store(pool: &PgPool) -> SessionStore {
    SessionStore::new(pool.clone(), 3600, COOKIE_NAME.to_string())
}

/// Unique per-run nickname so the unique constraint never trips across runs.
pub fn unique_nickname(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &suffix[..8])
}

pub struct TestUser {
    pub id: Uuid,
    pub nickname: String,
    pub cookie: Cookie<'static>,
}

/// Create an account through the service layer and mint a session for it,
/// keeping per-test setup off the wire.
pub async fn seed_user(pool: &PgPool, prefix: &str) -> TestUser {
    let nickname = unique_nickname(prefix);
    let service = AccountService::new(pool.clone());
    let (user, _profile) = service
        .sign_up(NewAccount {
            nickname: &nickname,
            password: PASSWORD,
            confirm_password: PASSWORD,
            name: "Test User",
            age: 30,
            gender: Gender::Female,
            profile_image: None,
        })
        .await
        .expect("seed user");

    let session = session_store(pool)
        .create(user.id)
        .await
        .expect("seed session");

    TestUser {
        id: user.id,
        nickname,
        cookie: Cookie::new(COOKIE_NAME, session.token),
    }
}

/// Drive one request through the app and reduce the outcome to a status and
/// JSON body. Session middleware rejections travel as service-level errors
/// rather than responses, so both shapes are folded here.
pub async fn send_request<S, B>(app: &S, req: Request) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let bytes = test::read_body(resp).await;
            let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
            (status, body)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
            (status, body)
        }
    }
}
