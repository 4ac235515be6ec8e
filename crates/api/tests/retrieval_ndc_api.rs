//! HTTP-level tests for retrieval completion rules and NDC revocation.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

struct Setup {
    emp_id: i64,
    hr_token: String,
    am_token: String,
    asset_id: i64,
}

/// Seed actors, a recoverable asset type, one asset, and allocate it to the
/// employee via the full workflow.
async fn allocate_one_asset(pool: &PgPool) -> Setup {
    let (emp_id, emp_token) = common::seed_user_with_token(pool, "emp", &["employee"]).await;
    let (_, mgr_token) = common::seed_user_with_token(pool, "mgr", &["manager"]).await;
    let (_, hr_token) = common::seed_user_with_token(pool, "hr", &["hr"]).await;
    let (am_id, am_token) = common::seed_user_with_token(pool, "am", &["asset_manager"]).await;
    let (_, admin_token) = common::seed_user_with_token(pool, "root", &["admin"]).await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-types",
        &admin_token,
        json!({
            "code": "LPT",
            "name": "Laptops",
            "to_be_recovered_on_separation": true,
            "assigned_asset_manager_id": am_id,
        }),
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
            "name": "Thinkpad T14",
            "asset_value": "1200.00",
        }),
    )
    .await;
    let asset_id = common::expect_data(response, StatusCode::CREATED).await["id"]
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
    let req = common::expect_data(response, StatusCode::CREATED).await["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool.clone());
    common::post_json(
        app,
        &format!("/api/v1/asset-requisitions/{req}/manager-action"),
        &mgr_token,
        json!({ "action": "approve", "reason": "ok" }),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    common::post_json(
        app,
        &format!("/api/v1/asset-requisitions/{req}/hr-action"),
        &hr_token,
        json!({ "action": "approve", "reason": "ok" }),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-allocations",
        &am_token,
        json!({ "requisition_id": req, "asset_definition_id": asset_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    Setup {
        emp_id,
        hr_token,
        am_token,
        asset_id,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retrieval_completion_requires_condition(pool: PgPool) {
    let setup = allocate_one_asset(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/asset-retrievals",
        &setup.am_token,
        json!({ "employee_id": setup.emp_id, "asset_definition_id": setup.asset_id }),
    )
    .await;
    let retrieval = common::expect_data(response, StatusCode::CREATED).await;
    let id = retrieval["id"].as_i64().unwrap();

    // recovered=true without a condition.
    let app = common::build_test_app(pool.clone());
    let response = common::put_json(
        app,
        &format!("/api/v1/asset-retrievals/{id}"),
        &setup.am_token,
        json!({ "recovered": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::error_code(response).await, "VALIDATION_ERROR");

    // Damaged without a recovery value.
    let app = common::build_test_app(pool.clone());
    let response = common::put_json(
        app,
        &format!("/api/v1/asset-retrievals/{id}"),
        &setup.am_token,
        json!({ "recovered": true, "asset_condition": "damaged" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Damaged with a value completes, and the asset lands in Damaged.
    let app = common::build_test_app(pool.clone());
    let response = common::put_json(
        app,
        &format!("/api/v1/asset-retrievals/{id}"),
        &setup.am_token,
        json!({
            "recovered": true,
            "asset_condition": "damaged",
            "recovery_value": "250.00",
        }),
    )
    .await;
    let data = common::expect_data(response, StatusCode::OK).await;
    assert_eq!(data["recovered"], true);

    let (_, admin_token) = common::seed_user_with_token(&pool, "root2", &["admin"]).await;
    let app = common::build_test_app(pool);
    let response = common::get(
        app,
        &format!("/api/v1/asset-definitions/{}", setup.asset_id),
        &admin_token,
    )
    .await;
    let data = common::expect_data(response, StatusCode::OK).await;
    assert_eq!(data["status_id"], 3); // Damaged
    assert!(data["allocated_to"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retrieval_for_unallocated_asset_is_400(pool: PgPool) {
    let setup = allocate_one_asset(&pool).await;
    let (other_id, _) = common::seed_user_with_token(&pool, "other", &["employee"]).await;

    // The asset is allocated, but not to this employee.
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/asset-retrievals",
        &setup.am_token,
        json!({ "employee_id": other_id, "asset_definition_id": setup.asset_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ndc_revoke_requires_reason_and_non_terminal(pool: PgPool) {
    let setup = allocate_one_asset(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/ndc-requests",
        &setup.hr_token,
        json!({
            "employee_id": setup.emp_id,
            "resigned_on": "2024-01-01",
            "last_working_date": "2024-01-31",
        }),
    )
    .await;
    let ndc = common::expect_data(response, StatusCode::CREATED).await;
    let ndc_id = ndc["id"].as_i64().unwrap();
    assert_eq!(ndc["retrievals"].as_array().unwrap().len(), 1);

    // Missing reason.
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        &format!("/api/v1/ndc-requests/{ndc_id}/revoke"),
        &setup.hr_token,
        json!({ "reason": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // With a reason it revokes and drops open obligations.
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        &format!("/api/v1/ndc-requests/{ndc_id}/revoke"),
        &setup.hr_token,
        json!({ "reason": "separation cancelled" }),
    )
    .await;
    let data = common::expect_data(response, StatusCode::OK).await;
    assert_eq!(data["status_id"], 4); // Revoked

    let app = common::build_test_app(pool.clone());
    let response = common::get(
        app,
        &format!("/api/v1/ndc-requests/{ndc_id}"),
        &setup.hr_token,
    )
    .await;
    let data = common::expect_data(response, StatusCode::OK).await;
    assert!(data["retrievals"].as_array().unwrap().is_empty());

    // A second revoke conflicts.
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        &format!("/api/v1/ndc-requests/{ndc_id}/revoke"),
        &setup.hr_token,
        json!({ "reason": "again" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ndc_endpoints_require_hr_capability(pool: PgPool) {
    let setup = allocate_one_asset(&pool).await;

    // Asset managers cannot open NDCs.
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/ndc-requests",
        &setup.am_token,
        json!({
            "employee_id": setup.emp_id,
            "resigned_on": "2024-01-01",
            "last_working_date": "2024-01-31",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
