//! HTTP-level tests for the asset type catalog and asset register,
//! including CSV export.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_asset_type_depreciation_validation(pool: PgPool) {
    let (_, admin_token) = common::seed_user_with_token(&pool, "root", &["admin"]).await;

    // Depreciation without a life is a 400 with a readable message.
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-types",
        &admin_token,
        json!({
            "code": "LPT",
            "name": "Laptops",
            "depreciation_applicable": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::error_code(response).await, "VALIDATION_ERROR");

    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/asset-types",
        &admin_token,
        json!({
            "code": "LPT",
            "name": "Laptops",
            "depreciation_applicable": true,
            "asset_life_months": 36,
        }),
    )
    .await;
    let data = common::expect_data(response, StatusCode::CREATED).await;
    assert_eq!(data["asset_life_months"], 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_cannot_manage_catalog(pool: PgPool) {
    let (_, emp_token) = common::seed_user_with_token(&pool, "emp", &["employee"]).await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-types",
        &emp_token,
        json!({ "code": "LPT", "name": "Laptops" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/asset-definitions",
        &emp_token,
        json!({
            "asset_type_id": 1,
            "asset_code": "A001",
            "name": "Sneaky",
            "asset_value": "1.00",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_asset_register_with_depreciated_book_value(pool: PgPool) {
    let (_, admin_token) = common::seed_user_with_token(&pool, "root", &["admin"]).await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-types",
        &admin_token,
        json!({
            "code": "LPT",
            "name": "Laptops",
            "depreciation_applicable": true,
            "asset_life_months": 12,
        }),
    )
    .await;
    let type_id = common::expect_data(response, StatusCode::CREATED).await["id"]
        .as_i64()
        .unwrap();

    // Purchased over a year ago: fully depreciated.
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/asset-definitions",
        &admin_token,
        json!({
            "asset_type_id": type_id,
            "asset_code": "A001",
            "name": "Old Thinkpad",
            "asset_value": "1200.00",
            "purchase_date": "2020-01-01",
        }),
    )
    .await;
    let data = common::expect_data(response, StatusCode::CREATED).await;
    assert_eq!(data["current_depreciation_value"], "0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_allocated_status_cannot_be_set_directly(pool: PgPool) {
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
        "/api/v1/asset-definitions",
        &admin_token,
        json!({
            "asset_type_id": type_id,
            "asset_code": "A001",
            "name": "Thinkpad",
            "asset_value": "1200.00",
        }),
    )
    .await;
    let asset_id = common::expect_data(response, StatusCode::CREATED).await["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool);
    let response = common::put_json(
        app,
        &format!("/api/v1/asset-definitions/{asset_id}"),
        &admin_token,
        json!({ "status_id": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_csv_export_of_asset_register(pool: PgPool) {
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
    common::post_json(
        app,
        "/api/v1/asset-definitions",
        &admin_token,
        json!({
            "asset_type_id": type_id,
            "asset_code": "A001",
            "name": "Laptop, 14 inch",
            "asset_value": "1200.00",
        }),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/asset-definitions/export", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv"
    );

    let body = common::body_text(response).await;
    let mut lines = body.lines();
    assert!(lines.next().unwrap().starts_with("asset_code,asset_type_code,"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("A001,LPT,"));
    // The comma in the name is quoted.
    assert!(row.contains("\"Laptop, 14 inch\""));
}
