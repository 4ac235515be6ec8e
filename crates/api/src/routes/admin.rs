//! Route definitions for the `/admin` resource (user management and the
//! audit trail).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{audit, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Capability gates are enforced by the handler extractors.
///
/// ```text
/// GET    /users                     -> list_users
/// POST   /users                     -> create_user
/// GET    /users/{id}                -> get_user
/// PUT    /users/{id}                -> update_user
/// DELETE /users/{id}                -> deactivate_user
/// POST   /users/{id}/reset-password -> reset_password
/// GET    /audit-logs                -> query_audit_logs
/// GET    /audit-logs/export         -> export_audit_logs (CSV)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
        .route("/users/{id}/reset-password", post(users::reset_password))
        .route("/audit-logs", get(audit::query_audit_logs))
        .route("/audit-logs/export", get(audit::export_audit_logs))
}
