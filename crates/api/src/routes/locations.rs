//! Route definitions for the `/locations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET  /      -> list_locations
/// POST /      -> create_location (location admin)
/// GET  /{id}  -> get_location
/// PUT  /{id}  -> update_location (location admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/{id}",
            get(locations::get_location).put(locations::update_location),
        )
}
