//! Route definitions for the singleton `/company-profile` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::company;
use crate::state::AppState;

/// Routes mounted at `/company-profile`.
///
/// ```text
/// GET /  -> get_profile
/// PUT /  -> update_profile (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(company::get_profile).put(company::update_profile))
}
