//! Handlers for the `/asset-types` catalog resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::Action;
use inventra_core::types::DbId;
use inventra_db::models::asset_type::{AssetType, CreateAssetType, UpdateAssetType};
use inventra_db::repositories::AssetTypeRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing asset types.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub active_only: bool,
}

/// Validate the depreciation fields of a create/update payload.
///
/// Mirrors the `ck_asset_types_life` schema constraint so the actor gets a
/// readable message instead of a constraint violation.
fn check_depreciation_fields(
    depreciation_applicable: bool,
    asset_life_months: Option<i32>,
) -> Result<(), AppError> {
    if depreciation_applicable {
        match asset_life_months {
            Some(months) if months > 0 => {}
            _ => {
                return Err(AppError::Core(CoreError::Validation(
                    "asset_life_months (positive) is required when depreciation is applicable"
                        .into(),
                )))
            }
        }
    }
    Ok(())
}

/// GET /api/v1/asset-types
pub async fn list_asset_types(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<AssetType>>>> {
    let types = AssetTypeRepo::list(&state.pool, params.active_only).await?;
    Ok(Json(DataResponse { data: types }))
}

/// GET /api/v1/asset-types/{id}
pub async fn get_asset_type(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssetType>>> {
    let asset_type = AssetTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id,
        }))?;
    Ok(Json(DataResponse { data: asset_type }))
}

/// POST /api/v1/asset-types
pub async fn create_asset_type(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAssetType>,
) -> AppResult<(StatusCode, Json<DataResponse<AssetType>>)> {
    auth.require(Action::ManageAssetTypes)?;

    if input.code.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Asset type code and name must not be empty".into(),
        )));
    }
    check_depreciation_fields(input.depreciation_applicable, input.asset_life_months)?;

    let asset_type = AssetTypeRepo::create(&state.pool, &input).await?;

    tracing::info!(
        asset_type_id = asset_type.id,
        code = %asset_type.code,
        user_id = auth.user_id,
        "Asset type created",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_CREATE,
        "asset_type",
        asset_type.id,
        serde_json::json!({ "code": asset_type.code }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset_type })))
}

/// PUT /api/v1/asset-types/{id}
pub async fn update_asset_type(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssetType>,
) -> AppResult<Json<DataResponse<AssetType>>> {
    auth.require(Action::ManageAssetTypes)?;

    // Validate against the post-update values so partial updates cannot
    // sneak past the depreciation rule.
    let existing = AssetTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id,
        }))?;
    let applicable = input
        .depreciation_applicable
        .unwrap_or(existing.depreciation_applicable);
    let life = input.asset_life_months.or(existing.asset_life_months);
    check_depreciation_fields(applicable, life)?;

    let asset_type = AssetTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id,
        }))?;

    tracing::info!(asset_type_id = id, user_id = auth.user_id, "Asset type updated");
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_UPDATE,
        "asset_type",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: asset_type }))
}

/// DELETE /api/v1/asset-types/{id}/assigned-manager
///
/// Clear the routing target of an asset type. Requisitions approved after
/// this fall into the manual-assignment worklist.
pub async fn clear_assigned_manager(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(Action::ManageAssetTypes)?;

    let cleared = AssetTypeRepo::clear_assigned_manager(&state.pool, id).await?;
    if !cleared {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id,
        }));
    }

    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_UPDATE,
        "asset_type",
        id,
        serde_json::json!({ "assigned_asset_manager_id": null }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
