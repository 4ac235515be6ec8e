//! Route definitions for the `/asset-retrievals` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::retrievals;
use crate::state::AppState;

/// Routes mounted at `/asset-retrievals`.
///
/// ```text
/// GET  /      -> list_retrievals (asset manager)
/// POST /      -> create_retrieval (asset manager)
/// GET  /{id}  -> get_retrieval
/// PUT  /{id}  -> update_retrieval (completion sets recovered=true)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(retrievals::list_retrievals).post(retrievals::create_retrieval),
        )
        .route(
            "/{id}",
            get(retrievals::get_retrieval).put(retrievals::update_retrieval),
        )
}
