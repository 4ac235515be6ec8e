pub mod admin;
pub mod allocations;
pub mod asset_definitions;
pub mod asset_types;
pub mod auth;
pub mod company;
pub mod health;
pub mod locations;
pub mod ndc;
pub mod requisitions;
pub mod retrievals;
pub mod separation_reasons;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
///
/// /admin/users                              list, create (user admin)
/// /admin/users/{id}                         get, update, deactivate
/// /admin/users/{id}/reset-password          reset password
/// /admin/audit-logs                         filtered query (auditor)
/// /admin/audit-logs/export                  CSV export (auditor)
///
/// /locations                                list (auth), create (admin)
/// /locations/{id}                           get, update
///
/// /company-profile                          get (auth), update (admin)
///
/// /separation-reasons                       list (auth), create (admin)
/// /separation-reasons/{id}                  update (admin)
///
/// /asset-types                              list (auth), create (catalog)
/// /asset-types/{id}                         get, update
/// /asset-types/{id}/assigned-manager        clear routing target (DELETE)
///
/// /asset-definitions                        list (auth), create (catalog)
/// /asset-definitions/export                 CSV export
/// /asset-definitions/import                 multipart CSV bulk import
/// /asset-definitions/stock-summary          counts per status
/// /asset-definitions/{id}                   get, update, delete
///
/// /asset-requisitions                       create, role-scoped list
/// /asset-requisitions/unrouted              manual-assignment worklist
/// /asset-requisitions/{id}                  get; DELETE = withdraw
/// /asset-requisitions/{id}/manager-action   {action, reason} (manager)
/// /asset-requisitions/{id}/hr-action        {action, reason} (HR)
/// /asset-requisitions/{id}/assign           manual routing (admin)
/// /pending-allocations                      allocation worklist (asset mgr)
///
/// /asset-allocations                        allocate (POST), list
/// /asset-allocations/{id}                   get
/// /asset-allocations/{id}/acknowledge       recipient confirms receipt
/// /my-assets                                caller's allocations
/// /allocated-assets                         allocated pool view
///
/// /asset-retrievals                         create, list (asset mgr)
/// /asset-retrievals/{id}                    get, update/complete
///
/// /ndc-requests                             create, list (HR)
/// /ndc-requests/{id}                        get with retrievals
/// /ndc-requests/{id}/revoke                 revoke with reason (HR)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login, refresh, logout).
        .nest("/auth", auth::router())
        // User administration and the audit trail.
        .nest("/admin", admin::router())
        // Supporting catalogs.
        .nest("/locations", locations::router())
        .nest("/company-profile", company::router())
        .nest("/separation-reasons", separation_reasons::router())
        // Asset catalog and register.
        .nest("/asset-types", asset_types::router())
        .nest("/asset-definitions", asset_definitions::router())
        // Requisition workflow.
        .nest("/asset-requisitions", requisitions::router())
        .route(
            "/pending-allocations",
            get(handlers::requisitions::pending_allocations),
        )
        // Allocation binder and views.
        .nest("/asset-allocations", allocations::router())
        .route("/my-assets", get(handlers::allocations::my_assets))
        .route(
            "/allocated-assets",
            get(handlers::allocations::allocated_assets),
        )
        // Retrieval tracker.
        .nest("/asset-retrievals", retrievals::router())
        // Separation clearance.
        .nest("/ndc-requests", ndc::router())
}
