//! Route definitions for the `/asset-allocations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::allocations;
use crate::state::AppState;

/// Routes mounted at `/asset-allocations`.
///
/// ```text
/// GET  /                  -> list_allocations (role-scoped)
/// POST /                  -> allocate (asset manager)
/// GET  /{id}              -> get_allocation
/// POST /{id}/acknowledge  -> acknowledge (recipient)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(allocations::list_allocations).post(allocations::allocate),
        )
        .route("/{id}", get(allocations::get_allocation))
        .route("/{id}/acknowledge", post(allocations::acknowledge))
}
