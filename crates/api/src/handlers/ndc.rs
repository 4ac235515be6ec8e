//! Handlers for the `/ndc-requests` resource (separation clearance).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::Action;
use inventra_core::types::DbId;
use inventra_db::models::ndc::{CreateNdcRequest, NdcListParams, NdcRequest};
use inventra_db::repositories::ndc_repo::NdcWithRetrievals;
use inventra_db::repositories::{NdcRepo, RetrievalRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /ndc-requests/{id}/revoke`.
#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    pub reason: String,
}

/// POST /api/v1/ndc-requests
///
/// Open separation clearance for an employee. Spawns one retrieval per
/// recoverable allocated asset; with nothing to recover, the NDC completes
/// immediately.
pub async fn create_ndc(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNdcRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<NdcWithRetrievals>>)> {
    auth.require(Action::ManageNdc)?;

    if UserRepo::find_by_id(&state.pool, input.employee_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.employee_id,
        }));
    }
    if input.last_working_date < input.resigned_on {
        return Err(AppError::Core(CoreError::Validation(
            "last_working_date must not precede resigned_on".into(),
        )));
    }

    let result = NdcRepo::create(&state.pool, &input).await?;

    tracing::info!(
        ndc_request_id = result.ndc.id,
        employee_id = input.employee_id,
        retrievals = result.retrievals.len(),
        user_id = auth.user_id,
        "NDC request created",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::NDC_CREATE,
        "ndc_request",
        result.ndc.id,
        serde_json::json!({
            "employee_id": input.employee_id,
            "retrievals": result.retrievals.len(),
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// GET /api/v1/ndc-requests
pub async fn list_ndc_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NdcListParams>,
) -> AppResult<Json<DataResponse<Vec<NdcRequest>>>> {
    auth.require(Action::ManageNdc)?;

    let requests = NdcRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/ndc-requests/{id}
///
/// An NDC request with its linked retrievals.
pub async fn get_ndc_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NdcWithRetrievals>>> {
    auth.require(Action::ManageNdc)?;

    let ndc = NdcRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NDC request",
            id,
        }))?;
    let retrievals = RetrievalRepo::list_for_ndc(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: NdcWithRetrievals { ndc, retrievals },
    }))
}

/// POST /api/v1/ndc-requests/{id}/revoke
///
/// Revoke a non-terminal NDC request. The reason is mandatory; open
/// retrieval obligations are dropped.
pub async fn revoke_ndc(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RevokeRequest>,
) -> AppResult<Json<DataResponse<NdcRequest>>> {
    auth.require(Action::RevokeNdc)?;

    let ndc = NdcRepo::revoke(&state.pool, id, auth.user_id, &input.reason).await?;

    tracing::info!(ndc_request_id = id, user_id = auth.user_id, "NDC request revoked");
    record_audit(
        &state,
        auth.user_id,
        action_types::NDC_REVOKE,
        "ndc_request",
        id,
        serde_json::json!({ "reason": input.reason }),
    )
    .await;

    Ok(Json(DataResponse { data: ndc }))
}
