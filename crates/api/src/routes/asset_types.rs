//! Route definitions for the `/asset-types` catalog resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::asset_types;
use crate::state::AppState;

/// Routes mounted at `/asset-types`.
///
/// ```text
/// GET    /                        -> list_asset_types
/// POST   /                        -> create_asset_type (catalog admin)
/// GET    /{id}                    -> get_asset_type
/// PUT    /{id}                    -> update_asset_type (catalog admin)
/// DELETE /{id}/assigned-manager   -> clear_assigned_manager (catalog admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(asset_types::list_asset_types).post(asset_types::create_asset_type),
        )
        .route(
            "/{id}",
            get(asset_types::get_asset_type).put(asset_types::update_asset_type),
        )
        .route(
            "/{id}/assigned-manager",
            delete(asset_types::clear_assigned_manager),
        )
}
