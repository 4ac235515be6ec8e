//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inventra_core::error::CoreError;
use inventra_core::roles::{self, Action};
use inventra_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication, then gate specific operations through
/// [`AuthUser::require`]:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     auth.require(Action::AllocateAsset)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The role set held by the user (from `claims.roles`).
    pub roles: Vec<String>,
}

impl AuthUser {
    /// Authorize an action against the capability table. Rejects with 403
    /// when none of the held roles permits it.
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        if roles::any_allowed(self.roles.iter().map(String::as_str), action) {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(format!(
                "Not permitted: {action:?}"
            ))))
        }
    }

    /// Whether the user holds a specific role.
    pub fn has_role(&self, role: inventra_core::roles::Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            roles: claims.roles,
        })
    }
}
