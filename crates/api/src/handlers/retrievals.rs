//! Handlers for the `/asset-retrievals` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::Action;
use inventra_core::types::DbId;
use inventra_db::models::retrieval::{
    CreateRetrieval, Retrieval, RetrievalListParams, RetrievalWithNames, UpdateRetrieval,
};
use inventra_db::repositories::RetrievalRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/asset-retrievals
///
/// Open an ad-hoc retrieval for an asset currently allocated to an
/// employee.
pub async fn create_retrieval(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRetrieval>,
) -> AppResult<(StatusCode, Json<DataResponse<Retrieval>>)> {
    auth.require(Action::RecordRetrieval)?;

    let retrieval = RetrievalRepo::create(&state.pool, &input).await?;

    tracing::info!(
        retrieval_id = retrieval.id,
        employee_id = input.employee_id,
        asset_definition_id = input.asset_definition_id,
        user_id = auth.user_id,
        "Retrieval opened",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::RETRIEVAL_CREATE,
        "retrieval",
        retrieval.id,
        serde_json::json!({
            "employee_id": input.employee_id,
            "asset_definition_id": input.asset_definition_id,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: retrieval })))
}

/// GET /api/v1/asset-retrievals
pub async fn list_retrievals(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RetrievalListParams>,
) -> AppResult<Json<DataResponse<Vec<RetrievalWithNames>>>> {
    auth.require(Action::RecordRetrieval)?;

    let retrievals = RetrievalRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: retrievals }))
}

/// GET /api/v1/asset-retrievals/{id}
pub async fn get_retrieval(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Retrieval>>> {
    auth.require(Action::RecordRetrieval)?;

    let retrieval = RetrievalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Retrieval",
            id,
        }))?;
    Ok(Json(DataResponse { data: retrieval }))
}

/// PUT /api/v1/asset-retrievals/{id}
///
/// Update a retrieval. Setting `recovered: true` completes it: the
/// condition is mandatory, `returned_on` defaults to today, a recovery
/// value is required for damaged assets, and the asset is released from
/// the employee in the same transaction.
pub async fn update_retrieval(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRetrieval>,
) -> AppResult<Json<DataResponse<Retrieval>>> {
    auth.require(Action::RecordRetrieval)?;

    let today = chrono::Utc::now().date_naive();
    let retrieval = RetrievalRepo::update(&state.pool, id, &input, today).await?;

    if retrieval.recovered {
        tracing::info!(
            retrieval_id = id,
            asset_condition = retrieval.asset_condition.as_deref().unwrap_or(""),
            user_id = auth.user_id,
            "Retrieval completed",
        );
        record_audit(
            &state,
            auth.user_id,
            action_types::RETRIEVAL_COMPLETE,
            "retrieval",
            id,
            serde_json::json!({
                "asset_condition": retrieval.asset_condition,
                "recovery_value": retrieval.recovery_value,
            }),
        )
        .await;
    }

    Ok(Json(DataResponse { data: retrieval }))
}
