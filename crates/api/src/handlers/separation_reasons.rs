//! Handlers for the `/separation-reasons` lookup resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::Action;
use inventra_core::types::DbId;
use inventra_db::models::separation_reason::{
    CreateSeparationReason, SeparationReason, UpdateSeparationReason,
};
use inventra_db::repositories::SeparationReasonRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/separation-reasons
pub async fn list_reasons(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<SeparationReason>>>> {
    let reasons = SeparationReasonRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: reasons }))
}

/// POST /api/v1/separation-reasons
pub async fn create_reason(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSeparationReason>,
) -> AppResult<(StatusCode, Json<DataResponse<SeparationReason>>)> {
    auth.require(Action::ManageSeparationReasons)?;

    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Separation reason name must not be empty".into(),
        )));
    }

    let reason = SeparationReasonRepo::create(&state.pool, &input).await?;

    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_CREATE,
        "separation_reason",
        reason.id,
        serde_json::json!({ "name": reason.name }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: reason })))
}

/// PUT /api/v1/separation-reasons/{id}
pub async fn update_reason(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSeparationReason>,
) -> AppResult<Json<DataResponse<SeparationReason>>> {
    auth.require(Action::ManageSeparationReasons)?;

    let reason = SeparationReasonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Separation reason",
            id,
        }))?;

    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_UPDATE,
        "separation_reason",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: reason }))
}
