//! Authorization extractors on top of the capability table.
//!
//! Authorization is decided by `inventra_core::roles::is_allowed`, a static
//! {role × action} lookup, never by string-comparing role names in
//! handlers. The extractors here cover the recurring coarse gates; anything
//! finer goes through [`AuthUser::require`] with the specific
//! [`Action`](inventra_core::roles::Action).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inventra_core::roles::Action;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
///
/// ```ignore
/// async fn any_authed(RequireAuth(user): RequireAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires the user-administration capability. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireUserAdmin(user): RequireUserAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to manage users here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireUserAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireUserAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require(Action::ManageUsers)?;
        Ok(RequireUserAdmin(user))
    }
}

/// Requires the audit-log capability. Rejects with 403 otherwise.
pub struct RequireAuditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require(Action::ViewAuditLogs)?;
        Ok(RequireAuditor(user))
    }
}
