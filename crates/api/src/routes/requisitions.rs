//! Route definitions for the `/asset-requisitions` workflow resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::requisitions;
use crate::state::AppState;

/// Routes mounted at `/asset-requisitions`.
///
/// ```text
/// GET    /                     -> list_requisitions (role-scoped)
/// POST   /                     -> create_requisition
/// GET    /unrouted             -> list_unrouted (routing admin)
/// GET    /{id}                 -> get_requisition
/// DELETE /{id}                 -> withdraw_requisition (requester, Pending)
/// POST   /{id}/manager-action  -> manager_action {action, reason}
/// POST   /{id}/hr-action       -> hr_action {action, reason}
/// POST   /{id}/assign          -> assign_requisition (routing admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requisitions::list_requisitions).post(requisitions::create_requisition),
        )
        .route("/unrouted", get(requisitions::list_unrouted))
        .route(
            "/{id}",
            get(requisitions::get_requisition).delete(requisitions::withdraw_requisition),
        )
        .route("/{id}/manager-action", post(requisitions::manager_action))
        .route("/{id}/hr-action", post(requisitions::hr_action))
        .route("/{id}/assign", post(requisitions::assign_requisition))
}
