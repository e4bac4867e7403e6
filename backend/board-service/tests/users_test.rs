//! API tests for sign-up, sign-in and profile management.
//!
//! Requires a reachable Postgres named by DATABASE_URL; each test skips with
//! a notice when none is available.

mod common;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use sqlx::Row;

use board_service::routes::configure_routes;
use board_service::services::SessionStore;

#[actix_web::test]
async fn sign_up_then_sign_in_sets_session_cookie() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    let nickname = common::unique_nickname("signup");
    let (status, body) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(serde_json::json!({
                "nickname": nickname,
                "password": common::PASSWORD,
                "confirm_password": common::PASSWORD,
                "name": "First Last",
                "age": 25,
                "gender": "female"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Sign-up completed.");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-in")
            .set_json(serde_json::json!({
                "nickname": nickname,
                "password": common::PASSWORD
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == common::COOKIE_NAME)
        .expect("session cookie issued")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));

    let (status, body) = common::send_request(
        &app,
        test::TestRequest::get()
            .uri("/api/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], nickname.as_str());
    assert_eq!(body["name"], "First Last");
    assert_eq!(body["age"], 25);
    assert_eq!(body["gender"], "FEMALE");
}

#[actix_web::test]
async fn registration_checks_run_in_order() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    // Nickname and password are both invalid; the nickname check fires first.
    let (status, body) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(serde_json::json!({
                "nickname": "ab",
                "password": "x",
                "confirm_password": "y",
                "name": "First Last",
                "age": 25,
                "gender": "MALE"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Nickname must be at least 3 characters.");

    let (status, body) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(serde_json::json!({
                "nickname": common::unique_nickname("order"),
                "password": "abc",
                "confirm_password": "abc",
                "name": "First Last",
                "age": 25,
                "gender": "MALE"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Password must be at least 4 characters.");

    // Containment is checked before the confirmation match.
    let nickname = common::unique_nickname("order");
    let (status, body) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(serde_json::json!({
                "nickname": nickname,
                "password": format!("{}99", nickname),
                "confirm_password": "something-else",
                "name": "First Last",
                "age": 25,
                "gender": "MALE"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Password must not contain the nickname.");

    let (status, body) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(serde_json::json!({
                "nickname": common::unique_nickname("order"),
                "password": "validpass",
                "confirm_password": "validpass2",
                "name": "First Last",
                "age": 25,
                "gender": "MALE"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(
        body["message"],
        "Password and password confirmation do not match."
    );
}

#[actix_web::test]
async fn duplicate_nickname_is_rejected() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    let nickname = common::unique_nickname("dup");
    let payload = serde_json::json!({
        "nickname": nickname,
        "password": common::PASSWORD,
        "confirm_password": common::PASSWORD,
        "name": "First Last",
        "age": 40,
        "gender": "MALE"
    });

    let (status, _) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(payload.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-up")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Nickname is already in use.");
}

#[actix_web::test]
async fn sign_in_failures_share_one_message() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    let user = common::seed_user(&pool, "signin").await;

    let (status, wrong_password) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-in")
            .set_json(serde_json::json!({
                "nickname": user.nickname,
                "password": "not-the-password"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = common::send_request(
        &app,
        test::TestRequest::post()
            .uri("/api/sign-in")
            .set_json(serde_json::json!({
                "nickname": common::unique_nickname("ghost"),
                "password": common::PASSWORD
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown nickname and wrong password must be indistinguishable.
    assert_eq!(wrong_password["message"], "Check your nickname or password.");
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[actix_web::test]
async fn missing_and_stale_sessions_are_rejected() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    let (status, body) = common::send_request(
        &app,
        test::TestRequest::get().uri("/api/users").to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Sign-in required.");

    let (status, _) = common::send_request(
        &app,
        test::TestRequest::get()
            .uri("/api/users")
            .cookie(Cookie::new(common::COOKIE_NAME, "deadbeef".repeat(8)))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A destroyed session stops working immediately.
    let user = common::seed_user(&pool, "stale").await;
    let (status, _) = common::send_request(
        &app,
        test::TestRequest::get()
            .uri("/api/users")
            .cookie(user.cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    common::session_store(&pool)
        .destroy(user.cookie.value())
        .await
        .expect("destroy session");

    let (status, _) = common::send_request(
        &app,
        test::TestRequest::get()
            .uri("/api/users")
            .cookie(user.cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A token past its expiry reads as no session at all.
    let expired = SessionStore::new(pool.clone(), 0, common::COOKIE_NAME.to_string())
        .create(user.id)
        .await
        .expect("create expired session");

    let (status, _) = common::send_request(
        &app,
        test::TestRequest::get()
            .uri("/api/users")
            .cookie(Cookie::new(common::COOKIE_NAME, expired.token))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_patch_records_history_per_changed_field() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    let user = common::seed_user(&pool, "patch").await;

    let patch = serde_json::json!({
        "name": "Renamed",
        "age": 31,
        "profile_image": "https://cdn.example.com/p.png"
    });
    let (status, body) = common::send_request(
        &app,
        test::TestRequest::patch()
            .uri("/api/users")
            .cookie(user.cookie.clone())
            .set_json(patch.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["age"], 31);
    assert_eq!(body["profile_image"], "https://cdn.example.com/p.png");

    let rows = sqlx::query(
        "SELECT field, old_value, new_value FROM user_histories \
         WHERE user_id = $1 ORDER BY field",
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await
    .expect("fetch history");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get::<String, _>("field"), "age");
    assert_eq!(rows[0].get::<String, _>("old_value"), "30");
    assert_eq!(rows[0].get::<String, _>("new_value"), "31");
    assert_eq!(rows[1].get::<String, _>("field"), "name");
    assert_eq!(rows[1].get::<String, _>("old_value"), "Test User");
    assert_eq!(rows[2].get::<String, _>("field"), "profile_image");
    assert_eq!(rows[2].get::<String, _>("old_value"), "null");

    // Replaying the same patch changes nothing and records nothing.
    let (status, _) = common::send_request(
        &app,
        test::TestRequest::patch()
            .uri("/api/users")
            .cookie(user.cookie.clone())
            .set_json(patch)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM user_histories WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .expect("count history")
        .get("n");
    assert_eq!(count, 3);
}

#[actix_web::test]
async fn profile_patch_rejects_bad_fields() {
    let Some(pool) = common::test_pool().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::session_store(&pool)))
            .configure(configure_routes),
    )
    .await;

    let user = common::seed_user(&pool, "badpatch").await;

    let (status, body) = common::send_request(
        &app,
        test::TestRequest::patch()
            .uri("/api/users")
            .cookie(user.cookie.clone())
            .set_json(serde_json::json!({ "gender": "OTHER" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Gender must be MALE or FEMALE.");

    // Fields outside the patch schema are rejected, not ignored.
    let (status, _) = common::send_request(
        &app,
        test::TestRequest::patch()
            .uri("/api/users")
            .cookie(user.cookie.clone())
            .set_json(serde_json::json!({ "nickname": "renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
