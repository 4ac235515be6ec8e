//! Handlers for the `/asset-requisitions` resource: creation, role-scoped
//! listing, the manager/HR action endpoints, withdrawal, and routing
//! repair.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::requisition::{
    self, ApprovalAction, NewRequisition, RequestFor, RequestType,
};
use inventra_core::roles::{Action, Role};
use inventra_core::status::AssetTypeStatus;
use inventra_core::types::DbId;
use inventra_db::models::requisition::{
    CreateRequisition, Requisition, RequisitionListParams, RequisitionWithNames,
};
use inventra_db::repositories::{AssetTypeRepo, RequisitionRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the manager-action and hr-action endpoints:
/// `{ "action": "approve" | "reject" | "hold", "reason": "..." }`.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    pub reason: String,
}

/// Request body for `POST /asset-requisitions/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub asset_manager_id: DbId,
}

// ---------------------------------------------------------------------------
// Creation / listing / withdrawal
// ---------------------------------------------------------------------------

/// POST /api/v1/asset-requisitions
///
/// Raise a requisition. Validated up front: replacement/return requests
/// must describe what comes back, team-member requests must name the
/// member, and the asset type must be active.
pub async fn create_requisition(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRequisition>,
) -> AppResult<(StatusCode, Json<DataResponse<Requisition>>)> {
    auth.require(Action::CreateRequisition)?;

    // Parse the wire enums first so unknown values read as validation
    // errors, not silent CHECK violations.
    let request_type = RequestType::parse(&input.request_type)?;
    let request_for = RequestFor::parse(&input.request_for)?;

    requisition::validate_new_requisition(&NewRequisition {
        request_type,
        request_for,
        team_member_id: input.team_member_id,
        justification: &input.justification,
        reason_for_return_replacement: input.reason_for_return_replacement.as_deref(),
        asset_details: input.asset_details.as_deref(),
    })?;

    let asset_type = AssetTypeRepo::find_by_id(&state.pool, input.asset_type_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id: input.asset_type_id,
        }))?;
    if asset_type.status_id != AssetTypeStatus::Active.id() {
        return Err(AppError::Core(CoreError::Validation(
            "Requisitions cannot be raised against an inactive asset type".into(),
        )));
    }

    if let Some(team_member_id) = input.team_member_id {
        if !UserRepo::is_active(&state.pool, team_member_id).await? {
            return Err(AppError::Core(CoreError::Validation(
                "team_member_id does not refer to an active user".into(),
            )));
        }
    }

    let requisition = RequisitionRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        requisition_id = requisition.id,
        asset_type_id = requisition.asset_type_id,
        user_id = auth.user_id,
        "Requisition created",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::REQUISITION_CREATE,
        "requisition",
        requisition.id,
        serde_json::json!({ "request_type": requisition.request_type }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: requisition })))
}

/// GET /api/v1/asset-requisitions
///
/// List requisitions. Workflow roles see everything (with filters);
/// plain employees see only their own requests.
pub async fn list_requisitions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(mut params): Query<RequisitionListParams>,
) -> AppResult<Json<DataResponse<Vec<RequisitionWithNames>>>> {
    let sees_all = auth.has_role(Role::Admin)
        || auth.has_role(Role::Manager)
        || auth.has_role(Role::Hr)
        || auth.has_role(Role::AssetManager);
    if !sees_all {
        params.requested_by = Some(auth.user_id);
    }

    let requisitions = RequisitionRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: requisitions }))
}

/// GET /api/v1/asset-requisitions/{id}
pub async fn get_requisition(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Requisition>>> {
    let requisition = RequisitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Requisition",
            id,
        }))?;

    // Employees may only inspect their own requisitions.
    let sees_all = auth.has_role(Role::Admin)
        || auth.has_role(Role::Manager)
        || auth.has_role(Role::Hr)
        || auth.has_role(Role::AssetManager);
    if !sees_all && requisition.requested_by != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not permitted to view this requisition".into(),
        )));
    }

    Ok(Json(DataResponse { data: requisition }))
}

/// DELETE /api/v1/asset-requisitions/{id}
///
/// Withdraw a requisition: only the original requester, only while
/// Pending. The row is deleted, matching the behaviour of the request
/// being taken back before anyone acted on it.
pub async fn withdraw_requisition(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    RequisitionRepo::withdraw(&state.pool, id, auth.user_id).await?;

    tracing::info!(requisition_id = id, user_id = auth.user_id, "Requisition withdrawn");
    record_audit(
        &state,
        auth.user_id,
        action_types::REQUISITION_WITHDRAW,
        "requisition",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Approval actions
// ---------------------------------------------------------------------------

/// POST /api/v1/asset-requisitions/{id}/manager-action
///
/// First-stage action by the manager. Valid only from Pending; a stale
/// status is a 409.
pub async fn manager_action(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ActionRequest>,
) -> AppResult<Json<DataResponse<Requisition>>> {
    auth.require(Action::ManagerAction)?;
    let action = ApprovalAction::parse(&input.action)?;
    requisition::validate_reason(&input.reason)?;

    let requisition =
        RequisitionRepo::manager_action(&state.pool, id, auth.user_id, action, &input.reason)
            .await?;

    tracing::info!(
        requisition_id = id,
        action = action.as_str(),
        user_id = auth.user_id,
        "Manager action applied",
    );
    record_audit(
        &state,
        auth.user_id,
        manager_audit_action(action),
        "requisition",
        id,
        serde_json::json!({ "reason": input.reason }),
    )
    .await;

    Ok(Json(DataResponse { data: requisition }))
}

/// POST /api/v1/asset-requisitions/{id}/hr-action
///
/// Second-stage action by HR, valid from ManagerApproved or OnHold. An
/// approval routes the requisition to the responsible asset manager in the
/// same transaction.
pub async fn hr_action(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ActionRequest>,
) -> AppResult<Json<DataResponse<Requisition>>> {
    auth.require(Action::HrAction)?;
    let action = ApprovalAction::parse(&input.action)?;
    requisition::validate_reason(&input.reason)?;

    let result =
        RequisitionRepo::hr_action(&state.pool, id, auth.user_id, action, &input.reason).await?;

    tracing::info!(
        requisition_id = id,
        action = action.as_str(),
        user_id = auth.user_id,
        "HR action applied",
    );
    record_audit(
        &state,
        auth.user_id,
        hr_audit_action(action),
        "requisition",
        id,
        serde_json::json!({ "reason": input.reason }),
    )
    .await;

    if let Some(outcome) = &result.routed {
        record_audit(
            &state,
            auth.user_id,
            action_types::ROUTE,
            "requisition",
            id,
            serde_json::json!({
                "assigned_to": outcome.assigned_to,
                "routing_reason": outcome.routing_reason,
            }),
        )
        .await;
        if outcome.needs_manual_assignment {
            tracing::warn!(
                requisition_id = id,
                "Requisition needs manual asset manager assignment",
            );
        }
    }

    Ok(Json(DataResponse {
        data: result.requisition,
    }))
}

// ---------------------------------------------------------------------------
// Routing repair
// ---------------------------------------------------------------------------

/// GET /api/v1/asset-requisitions/unrouted
///
/// Requisitions awaiting manual asset manager assignment.
pub async fn list_unrouted(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Requisition>>>> {
    auth.require(Action::ManualRoutingAssignment)?;

    let requisitions = RequisitionRepo::list_unrouted(&state.pool).await?;
    Ok(Json(DataResponse { data: requisitions }))
}

/// POST /api/v1/asset-requisitions/{id}/assign
///
/// Manually route a requisition to an asset manager.
pub async fn assign_requisition(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<DataResponse<Requisition>>> {
    auth.require(Action::ManualRoutingAssignment)?;

    if !UserRepo::is_active(&state.pool, input.asset_manager_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "asset_manager_id does not refer to an active user".into(),
        )));
    }

    let requisition =
        RequisitionRepo::manual_assign(&state.pool, id, input.asset_manager_id).await?;

    tracing::info!(
        requisition_id = id,
        asset_manager_id = input.asset_manager_id,
        user_id = auth.user_id,
        "Requisition manually assigned",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::MANUAL_ASSIGN,
        "requisition",
        id,
        serde_json::json!({ "asset_manager_id": input.asset_manager_id }),
    )
    .await;

    Ok(Json(DataResponse { data: requisition }))
}

/// GET /api/v1/pending-allocations
///
/// The caller's allocation worklist: requisitions routed to them and
/// waiting for an asset.
pub async fn pending_allocations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Requisition>>>> {
    auth.require(Action::AllocateAsset)?;

    let requisitions =
        RequisitionRepo::pending_allocations_for(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: requisitions }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn manager_audit_action(action: ApprovalAction) -> &'static str {
    match action {
        ApprovalAction::Approve => action_types::MANAGER_APPROVE,
        ApprovalAction::Reject => action_types::MANAGER_REJECT,
        ApprovalAction::Hold => action_types::MANAGER_HOLD,
    }
}

fn hr_audit_action(action: ApprovalAction) -> &'static str {
    match action {
        ApprovalAction::Approve => action_types::HR_APPROVE,
        ApprovalAction::Reject => action_types::HR_REJECT,
        ApprovalAction::Hold => action_types::HR_HOLD,
    }
}
