//! Route definitions for the `/ndc-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ndc;
use crate::state::AppState;

/// Routes mounted at `/ndc-requests`.
///
/// ```text
/// GET  /             -> list_ndc_requests (HR)
/// POST /             -> create_ndc (HR)
/// GET  /{id}         -> get_ndc_request (with linked retrievals)
/// POST /{id}/revoke  -> revoke_ndc {reason} (HR)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ndc::list_ndc_requests).post(ndc::create_ndc))
        .route("/{id}", get(ndc::get_ndc_request))
        .route("/{id}/revoke", post(ndc::revoke_ndc))
}
