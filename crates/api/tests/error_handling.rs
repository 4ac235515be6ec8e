//! Cross-cutting error handling tests: auth failures, the JSON error
//! envelope, and not-found behaviour.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get_unauthed(app, "/api/v1/asset-types").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::error_code(response).await, "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/asset-types", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_not_found_entity_has_error_envelope(pool: PgPool) {
    let (_, admin_token) = common::seed_user_with_token(&pool, "root", &["admin"]).await;

    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/asset-types/999999", &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = common::body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("Asset type"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let (_, admin_token) = common::seed_user_with_token(&pool, "root", &["admin"]).await;
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/does-not-exist", &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_unique_value_is_409(pool: PgPool) {
    let (_, admin_token) = common::seed_user_with_token(&pool, "root", &["admin"]).await;

    let payload = json!({ "code": "LPT", "name": "Laptops" });
    let app = common::build_test_app(pool.clone());
    let response =
        common::post_json(app, "/api/v1/asset-types", &admin_token, payload.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The uq_ constraint violation surfaces as a conflict, not a 500.
    let app = common::build_test_app(pool);
    let response = common::post_json(app, "/api/v1/asset-types", &admin_token, payload).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(common::error_code(response).await, "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_action_value_is_400(pool: PgPool) {
    let (_, emp_token) = common::seed_user_with_token(&pool, "emp", &["employee"]).await;
    let (_, mgr_token) = common::seed_user_with_token(&pool, "mgr", &["manager"]).await;
    let (_, admin_token) = common::seed_user_with_token(&pool, "root", &["admin"]).await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-types",
        &admin_token,
        json!({ "code": "LPT", "name": "Laptops" }),
    )
    .await;
    let type_id = common::expect_data(response, StatusCode::CREATED).await["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-requisitions",
        &emp_token,
        json!({
            "asset_type_id": type_id,
            "request_type": "new_allocation",
            "request_for": "self",
            "justification": "needed",
        }),
    )
    .await;
    let id = common::expect_data(response, StatusCode::CREATED).await["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        &format!("/api/v1/asset-requisitions/{id}/manager-action"),
        &mgr_token,
        json!({ "action": "escalate", "reason": "because" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::error_code(response).await, "VALIDATION_ERROR");
}
