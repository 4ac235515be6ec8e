//! HTTP-level tests for login, token refresh, logout, and lockout.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_returns_tokens_and_roles(pool: PgPool) {
    common::seed_user(&pool, "avery", &["employee", "asset_manager"]).await;

    let app = common::build_test_app(pool);
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/login",
        json!({ "username": "avery", "password": "correct-horse-battery" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["user"]["username"], "avery");
    assert_eq!(
        body["user"]["roles"],
        json!(["asset_manager", "employee"]),
        "roles are the full ordered set"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    common::seed_user(&pool, "avery", &["employee"]).await;

    let app = common::build_test_app(pool);
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/login",
        json!({ "username": "avery", "password": "nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_locks_after_repeated_failures(pool: PgPool) {
    common::seed_user(&pool, "avery", &["employee"]).await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let response = common::post_json_unauthed(
            app,
            "/api/v1/auth/login",
            json!({ "username": "avery", "password": "nope" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is rejected while locked.
    let app = common::build_test_app(pool);
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/login",
        json!({ "username": "avery", "password": "correct-horse-battery" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_tokens(pool: PgPool) {
    common::seed_user(&pool, "avery", &["employee"]).await;

    let app = common::build_test_app(pool.clone());
    let login = common::post_json_unauthed(
        app,
        "/api/v1/auth/login",
        json!({ "username": "avery", "password": "correct-horse-battery" }),
    )
    .await;
    let body = common::body_json(login).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds and returns a different refresh token.
    let app = common::build_test_app(pool.clone());
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = common::body_json(response).await;
    assert_ne!(rotated["refresh_token"].as_str().unwrap(), refresh_token);

    // The old token is burned.
    let app = common::build_test_app(pool);
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    let (user_id, token) = common::seed_user_with_token(&pool, "avery", &["employee"]).await;
    let _ = user_id;

    let app = common::build_test_app(pool.clone());
    let login = common::post_json_unauthed(
        app,
        "/api/v1/auth/login",
        json!({ "username": "avery", "password": "correct-horse-battery" }),
    )
    .await;
    let body = common::body_json(login).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(app, "/api/v1/auth/logout", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The refresh token no longer works.
    let app = common::build_test_app(pool);
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_user_cannot_login(pool: PgPool) {
    let (user_id, _) = common::seed_user_with_token(&pool, "avery", &["employee"]).await;
    inventra_db::repositories::UserRepo::deactivate(&pool, user_id)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = common::post_json_unauthed(
        app,
        "/api/v1/auth/login",
        json!({ "username": "avery", "password": "correct-horse-battery" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
