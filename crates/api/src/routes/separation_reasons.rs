//! Route definitions for the `/separation-reasons` lookup resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::separation_reasons;
use crate::state::AppState;

/// Routes mounted at `/separation-reasons`.
///
/// ```text
/// GET  /      -> list_reasons
/// POST /      -> create_reason (admin)
/// PUT  /{id}  -> update_reason (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(separation_reasons::list_reasons).post(separation_reasons::create_reason),
        )
        .route("/{id}", put(separation_reasons::update_reason))
}
