//! Handlers for the `/locations` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::Action;
use inventra_core::types::DbId;
use inventra_db::models::location::{CreateLocation, Location, UpdateLocation};
use inventra_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/locations
///
/// List locations. Any authenticated user may read the catalog.
pub async fn list_locations(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Location>>>> {
    let locations = LocationRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// GET /api/v1/locations/{id}
pub async fn get_location(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Location>>> {
    let location = LocationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;
    Ok(Json(DataResponse { data: location }))
}

/// POST /api/v1/locations
pub async fn create_location(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<DataResponse<Location>>)> {
    auth.require(Action::ManageLocations)?;

    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Location name must not be empty".into(),
        )));
    }

    let location = LocationRepo::create(&state.pool, &input).await?;

    tracing::info!(location_id = location.id, name = %location.name, user_id = auth.user_id, "Location created");
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_CREATE,
        "location",
        location.id,
        serde_json::json!({ "name": location.name }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/locations/{id}
pub async fn update_location(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<Json<DataResponse<Location>>> {
    auth.require(Action::ManageLocations)?;

    let location = LocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    tracing::info!(location_id = id, user_id = auth.user_id, "Location updated");
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_UPDATE,
        "location",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: location }))
}
