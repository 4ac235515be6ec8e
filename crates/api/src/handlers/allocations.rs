//! Handlers for the `/asset-allocations` resource, the acknowledgment
//! sub-flow, and the allocated-asset views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::{Action, Role};
use inventra_core::status::AssetStatus;
use inventra_core::types::DbId;
use inventra_db::models::allocation::{
    AcknowledgeAllocation, Allocation, AllocationListParams, AllocationMetadata,
    AllocationWithAsset,
};
use inventra_db::models::asset_definition::{AssetDefinitionWithNames, AssetSearchParams};
use inventra_db::repositories::{AllocationRepo, AssetDefinitionRepo, RequisitionRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /asset-allocations`.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    pub requisition_id: DbId,
    pub asset_definition_id: DbId,
    #[serde(flatten)]
    pub metadata: AllocationMetadata,
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// POST /api/v1/asset-allocations
///
/// Bind an available asset to a requisition routed to the caller. The
/// whole binding is atomic; a concurrently claimed asset or an already
/// allocated requisition surfaces as 409.
pub async fn allocate(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AllocateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Allocation>>)> {
    auth.require(Action::AllocateAsset)?;

    // Only the asset manager the requisition is routed to may fulfil it.
    let requisition = RequisitionRepo::find_by_id(&state.pool, input.requisition_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Requisition",
            id: input.requisition_id,
        }))?;
    match requisition.assigned_to {
        Some(assigned) if assigned == auth.user_id => {}
        Some(_) => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Requisition is routed to a different asset manager".into(),
            )))
        }
        None => {
            return Err(AppError::Core(CoreError::Conflict(
                "Requisition has no assigned asset manager yet".into(),
            )))
        }
    }

    let allocation = AllocationRepo::allocate(
        &state.pool,
        input.requisition_id,
        input.asset_definition_id,
        auth.user_id,
        &input.metadata,
    )
    .await?;

    tracing::info!(
        allocation_id = allocation.id,
        requisition_id = input.requisition_id,
        asset_definition_id = input.asset_definition_id,
        user_id = auth.user_id,
        "Asset allocated",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::ALLOCATE,
        "allocation",
        allocation.id,
        serde_json::json!({
            "requisition_id": input.requisition_id,
            "asset_definition_id": input.asset_definition_id,
            "allocated_to": allocation.allocated_to,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: allocation })))
}

/// GET /api/v1/asset-allocations
///
/// List allocations. Workflow roles see everything; employees see their
/// own.
pub async fn list_allocations(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(mut params): Query<AllocationListParams>,
) -> AppResult<Json<DataResponse<Vec<Allocation>>>> {
    let sees_all =
        auth.has_role(Role::Admin) || auth.has_role(Role::AssetManager) || auth.has_role(Role::Hr);
    if !sees_all {
        params.allocated_to = Some(auth.user_id);
    }

    let allocations = AllocationRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: allocations }))
}

/// GET /api/v1/asset-allocations/{id}
pub async fn get_allocation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Allocation>>> {
    let allocation = AllocationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Allocation",
            id,
        }))?;

    let sees_all =
        auth.has_role(Role::Admin) || auth.has_role(Role::AssetManager) || auth.has_role(Role::Hr);
    if !sees_all && allocation.allocated_to != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not permitted to view this allocation".into(),
        )));
    }

    Ok(Json(DataResponse { data: allocation }))
}

// ---------------------------------------------------------------------------
// Acknowledgment
// ---------------------------------------------------------------------------

/// POST /api/v1/asset-allocations/{id}/acknowledge
///
/// Recipient confirms receipt. One-shot; does not gate anything else.
pub async fn acknowledge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AcknowledgeAllocation>,
) -> AppResult<Json<DataResponse<Allocation>>> {
    auth.require(Action::AcknowledgeAllocation)?;

    let allocation =
        AllocationRepo::acknowledge(&state.pool, id, auth.user_id, input.notes.as_deref()).await?;

    tracing::info!(allocation_id = id, user_id = auth.user_id, "Allocation acknowledged");
    record_audit(
        &state,
        auth.user_id,
        action_types::ACKNOWLEDGE,
        "allocation",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: allocation }))
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// GET /api/v1/my-assets
///
/// The caller's allocations with asset details; unacknowledged first.
pub async fn my_assets(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AllocationWithAsset>>>> {
    let allocations = AllocationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: allocations }))
}

/// GET /api/v1/allocated-assets
///
/// All assets currently in Allocated status, with holder references.
/// Asset manager / admin view.
pub async fn allocated_assets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> AppResult<Json<DataResponse<Vec<AssetDefinitionWithNames>>>> {
    if !(auth.has_role(Role::Admin) || auth.has_role(Role::AssetManager)) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Asset manager or admin role required".into(),
        )));
    }

    let params = AssetSearchParams {
        status_id: Some(AssetStatus::Allocated.id()),
        ..params
    };
    let assets = AssetDefinitionRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: assets }))
}
