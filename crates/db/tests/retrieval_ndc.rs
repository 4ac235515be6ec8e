//! Integration tests for the retrieval tracker and NDC separation flow:
//! creation gates, completion validation side effects, NDC obligation
//! spawning, status progression, and revocation.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use inventra_core::error::CoreError;
use inventra_core::requisition::ApprovalAction;
use inventra_core::retrieval::{CONDITION_DAMAGED, CONDITION_GOOD};
use inventra_core::status::{AllocationStatus, AssetStatus, NdcStatus};
use inventra_core::types::DbId;
use inventra_db::models::allocation::AllocationMetadata;
use inventra_db::models::asset_definition::CreateAssetDefinition;
use inventra_db::models::asset_type::CreateAssetType;
use inventra_db::models::ndc::CreateNdcRequest;
use inventra_db::models::requisition::CreateRequisition;
use inventra_db::models::retrieval::{CreateRetrieval, UpdateRetrieval};
use inventra_db::models::user::CreateUser;
use inventra_db::repositories::{
    AllocationRepo, AssetDefinitionRepo, AssetTypeRepo, NdcRepo, RepoError, RequisitionRepo,
    RetrievalRepo, UserRepo,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

async fn seed_user(pool: &PgPool, username: &str, role_ids: Vec<DbId>) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.test"),
            password_hash: "$argon2id$test-hash".to_string(),
            location_id: None,
            manager_id: None,
            role_ids,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_asset_type(pool: &PgPool, code: &str, manager: DbId, recovered: bool) -> DbId {
    AssetTypeRepo::create(
        pool,
        &CreateAssetType {
            code: code.to_string(),
            name: format!("{code} type"),
            description: None,
            depreciation_applicable: false,
            asset_life_months: None,
            to_be_recovered_on_separation: recovered,
            assigned_asset_manager_id: Some(manager),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_asset(pool: &PgPool, type_id: DbId, code: &str) -> DbId {
    AssetDefinitionRepo::create(
        pool,
        &CreateAssetDefinition {
            asset_type_id: type_id,
            asset_code: code.to_string(),
            name: format!("Asset {code}"),
            asset_value: Decimal::from(1000),
            purchase_date: None,
            assigned_asset_manager_id: None,
            location_id: None,
            remarks: None,
        },
        None,
    )
    .await
    .unwrap()
    .id
}

/// Allocate an asset to an employee via the full approval path.
async fn allocate_to(pool: &PgPool, employee: DbId, am: DbId, type_id: DbId, asset: DbId) {
    let manager = seed_user(pool, &format!("mgr_{asset}"), vec![2]).await;
    let hr = seed_user(pool, &format!("hr_{asset}"), vec![3]).await;

    let req = RequisitionRepo::create(
        pool,
        employee,
        &CreateRequisition {
            asset_type_id: type_id,
            request_type: "new_allocation".to_string(),
            request_for: "self".to_string(),
            team_member_id: None,
            justification: "needed".to_string(),
            reason_for_return_replacement: None,
            asset_details: None,
            required_by_date: None,
        },
    )
    .await
    .unwrap();
    RequisitionRepo::manager_action(pool, req.id, manager, ApprovalAction::Approve, "ok")
        .await
        .unwrap();
    RequisitionRepo::hr_action(pool, req.id, hr, ApprovalAction::Approve, "ok")
        .await
        .unwrap();
    AllocationRepo::allocate(pool, req.id, asset, am, &AllocationMetadata::default())
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Ad-hoc retrievals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_retrieval_requires_allocation_to_employee(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let other = seed_user(&pool, "other", vec![5]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let asset = seed_asset(&pool, laptop, "LPT-0001").await;

    // Not allocated at all.
    let err = RetrievalRepo::create(
        &pool,
        &CreateRetrieval {
            employee_id: employee,
            asset_definition_id: asset,
            remarks: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    allocate_to(&pool, employee, am, laptop, asset).await;

    // Allocated, but to someone else.
    let err = RetrievalRepo::create(
        &pool,
        &CreateRetrieval {
            employee_id: other,
            asset_definition_id: asset,
            remarks: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    // Correct employee.
    let retrieval = RetrievalRepo::create(
        &pool,
        &CreateRetrieval {
            employee_id: employee,
            asset_definition_id: asset,
            remarks: Some("left the team".to_string()),
        },
    )
    .await
    .unwrap();
    assert!(!retrieval.recovered);
    assert_eq!(retrieval.ndc_request_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_good_condition_releases_asset(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let asset = seed_asset(&pool, laptop, "LPT-0001").await;
    allocate_to(&pool, employee, am, laptop, asset).await;

    let retrieval = RetrievalRepo::create(
        &pool,
        &CreateRetrieval {
            employee_id: employee,
            asset_definition_id: asset,
            remarks: None,
        },
    )
    .await
    .unwrap();

    let completed = RetrievalRepo::update(
        &pool,
        retrieval.id,
        &UpdateRetrieval {
            recovered: Some(true),
            asset_condition: Some(CONDITION_GOOD.to_string()),
            returned_on: None,
            recovery_value: None,
            remarks: None,
        },
        today(),
    )
    .await
    .unwrap();

    assert!(completed.recovered);
    // returned_on defaults to today when not supplied.
    assert_eq!(completed.returned_on, Some(today()));

    // The asset went back to the pool.
    let asset_row = AssetDefinitionRepo::find_by_id(&pool, asset).await.unwrap().unwrap();
    assert_eq!(asset_row.status_id, AssetStatus::Available.id());
    assert_eq!(asset_row.allocated_to, None);

    // The allocation record is closed.
    let active = AllocationRepo::find_active_for_asset(&pool, asset).await.unwrap();
    assert!(active.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_damaged_requires_recovery_value(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let asset = seed_asset(&pool, laptop, "LPT-0001").await;
    allocate_to(&pool, employee, am, laptop, asset).await;

    let retrieval = RetrievalRepo::create(
        &pool,
        &CreateRetrieval {
            employee_id: employee,
            asset_definition_id: asset,
            remarks: None,
        },
    )
    .await
    .unwrap();

    // Damaged without a recovery value.
    let err = RetrievalRepo::update(
        &pool,
        retrieval.id,
        &UpdateRetrieval {
            recovered: Some(true),
            asset_condition: Some(CONDITION_DAMAGED.to_string()),
            returned_on: None,
            recovery_value: None,
            remarks: None,
        },
        today(),
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    // With the value, the asset lands in Damaged.
    let completed = RetrievalRepo::update(
        &pool,
        retrieval.id,
        &UpdateRetrieval {
            recovered: Some(true),
            asset_condition: Some(CONDITION_DAMAGED.to_string()),
            returned_on: Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            recovery_value: Some(Decimal::from(250)),
            remarks: None,
        },
        today(),
    )
    .await
    .unwrap();
    assert_eq!(
        completed.returned_on,
        Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    );

    let asset_row = AssetDefinitionRepo::find_by_id(&pool, asset).await.unwrap().unwrap();
    assert_eq!(asset_row.status_id, AssetStatus::Damaged.id());
    assert_eq!(asset_row.allocated_to, None);

    let allocations = AllocationRepo::list(
        &pool,
        &inventra_db::models::allocation::AllocationListParams {
            asset_definition_id: Some(asset),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(allocations[0].status_id, AllocationStatus::Damaged.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_twice_conflicts(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let asset = seed_asset(&pool, laptop, "LPT-0001").await;
    allocate_to(&pool, employee, am, laptop, asset).await;

    let retrieval = RetrievalRepo::create(
        &pool,
        &CreateRetrieval {
            employee_id: employee,
            asset_definition_id: asset,
            remarks: None,
        },
    )
    .await
    .unwrap();

    let complete = UpdateRetrieval {
        recovered: Some(true),
        asset_condition: Some(CONDITION_GOOD.to_string()),
        returned_on: None,
        recovery_value: None,
        remarks: None,
    };
    RetrievalRepo::update(&pool, retrieval.id, &complete, today())
        .await
        .unwrap();

    let err = RetrievalRepo::update(&pool, retrieval.id, &complete, today())
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// NDC separation flow
// ---------------------------------------------------------------------------

fn new_ndc(employee: DbId) -> CreateNdcRequest {
    CreateNdcRequest {
        employee_id: employee,
        resigned_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        notice_period_days: 30,
        last_working_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        separation_approved_by: None,
        separation_reason_id: Some(1),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ndc_spawns_retrievals_for_recoverable_assets(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let badge = seed_asset_type(&pool, "BDG", am, false).await;

    let laptop_asset = seed_asset(&pool, laptop, "LPT-0001").await;
    let monitor_asset = seed_asset(&pool, laptop, "LPT-0002").await;
    let badge_asset = seed_asset(&pool, badge, "BDG-0001").await;
    allocate_to(&pool, employee, am, laptop, laptop_asset).await;
    allocate_to(&pool, employee, am, laptop, monitor_asset).await;
    allocate_to(&pool, employee, am, badge, badge_asset).await;

    let result = NdcRepo::create(&pool, &new_ndc(employee)).await.unwrap();

    // Only the recoverable types become obligations; the badge type is not
    // recovered on separation.
    assert_eq!(result.retrievals.len(), 2);
    assert_eq!(result.ndc.status_id, NdcStatus::Pending.id());
    assert!(result
        .retrievals
        .iter()
        .all(|r| r.ndc_request_id == Some(result.ndc.id) && !r.recovered));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ndc_with_nothing_to_recover_completes_immediately(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let result = NdcRepo::create(&pool, &new_ndc(employee)).await.unwrap();
    assert!(result.retrievals.is_empty());
    assert_eq!(result.ndc.status_id, NdcStatus::Completed.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ndc_progresses_as_retrievals_resolve(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let asset_a = seed_asset(&pool, laptop, "LPT-0001").await;
    let asset_b = seed_asset(&pool, laptop, "LPT-0002").await;
    allocate_to(&pool, employee, am, laptop, asset_a).await;
    allocate_to(&pool, employee, am, laptop, asset_b).await;

    let result = NdcRepo::create(&pool, &new_ndc(employee)).await.unwrap();
    let [first, second] = &result.retrievals[..] else {
        panic!("expected two retrievals");
    };

    let complete = UpdateRetrieval {
        recovered: Some(true),
        asset_condition: Some(CONDITION_GOOD.to_string()),
        returned_on: None,
        recovery_value: None,
        remarks: None,
    };

    // First recovery: some resolved -> Asset Manager Confirmation.
    RetrievalRepo::update(&pool, first.id, &complete, today())
        .await
        .unwrap();
    let ndc = NdcRepo::find_by_id(&pool, result.ndc.id).await.unwrap().unwrap();
    assert_eq!(ndc.status_id, NdcStatus::AssetManagerConfirmation.id());

    // Second recovery: all resolved -> Completed.
    RetrievalRepo::update(&pool, second.id, &complete, today())
        .await
        .unwrap();
    let ndc = NdcRepo::find_by_id(&pool, result.ndc.id).await.unwrap().unwrap();
    assert_eq!(ndc.status_id, NdcStatus::Completed.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ndc_revoke_deletes_open_obligations(pool: PgPool) {
    let employee = seed_user(&pool, "emp", vec![5]).await;
    let hr = seed_user(&pool, "hr", vec![3]).await;
    let am = seed_user(&pool, "am", vec![4]).await;
    let laptop = seed_asset_type(&pool, "LPT", am, true).await;
    let asset = seed_asset(&pool, laptop, "LPT-0001").await;
    allocate_to(&pool, employee, am, laptop, asset).await;

    let result = NdcRepo::create(&pool, &new_ndc(employee)).await.unwrap();

    // Revoke without a reason is rejected.
    let err = NdcRepo::revoke(&pool, result.ndc.id, hr, "  ").await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    let revoked = NdcRepo::revoke(&pool, result.ndc.id, hr, "separation cancelled")
        .await
        .unwrap();
    assert_eq!(revoked.status_id, NdcStatus::Revoked.id());
    assert_eq!(revoked.revoked_by, Some(hr));

    // Open obligations are gone; the asset stays with the employee.
    let remaining = RetrievalRepo::list_for_ndc(&pool, result.ndc.id).await.unwrap();
    assert!(remaining.is_empty());
    let asset_row = AssetDefinitionRepo::find_by_id(&pool, asset).await.unwrap().unwrap();
    assert_eq!(asset_row.status_id, AssetStatus::Allocated.id());

    // Revoking a terminal NDC conflicts.
    let err = NdcRepo::revoke(&pool, result.ndc.id, hr, "again").await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));
}
