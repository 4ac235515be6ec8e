//! Route definitions for the `/asset-definitions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::asset_definitions;
use crate::state::AppState;

/// Routes mounted at `/asset-definitions`.
///
/// ```text
/// GET    /               -> list_assets (filtered search)
/// POST   /               -> create_asset (catalog admin)
/// GET    /export         -> export_assets (CSV)
/// POST   /import         -> import_assets (multipart CSV)
/// GET    /stock-summary  -> stock_summary
/// GET    /{id}           -> get_asset
/// PUT    /{id}           -> update_asset (catalog admin)
/// DELETE /{id}           -> delete_asset (catalog admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(asset_definitions::list_assets).post(asset_definitions::create_asset),
        )
        .route("/export", get(asset_definitions::export_assets))
        .route("/import", post(asset_definitions::import_assets))
        .route("/stock-summary", get(asset_definitions::stock_summary))
        .route(
            "/{id}",
            get(asset_definitions::get_asset)
                .put(asset_definitions::update_asset)
                .delete(asset_definitions::delete_asset),
        )
}
