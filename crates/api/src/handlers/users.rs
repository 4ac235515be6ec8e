//! Handlers for the `/admin/users` resource (user administration).
//!
//! All handlers require the user-administration capability via
//! [`RequireUserAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::error::CoreError;
use inventra_core::roles::Role;
use inventra_core::types::DbId;
use inventra_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use inventra_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::rbac::RequireUserAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Role names from the seeded set; at least one is required.
    pub roles: Vec<String>,
    pub location_id: Option<DbId>,
    pub manager_id: Option<DbId>,
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// When present, replaces the user's full role set.
    pub roles: Option<Vec<String>>,
    pub location_id: Option<DbId>,
    pub manager_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a new user with a role set. Validates password strength and role
/// names, hashes the password, and returns a safe [`UserResponse`] with
/// 201 Created.
pub async fn create_user(
    RequireUserAdmin(admin): RequireUserAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_password_strength(&input.password)?;
    let role_ids = resolve_role_names(&state, &input.roles).await?;

    let hashed = hash_password(&input.password)?;

    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        password_hash: hashed,
        location_id: input.location_id,
        manager_id: input.manager_id,
        role_ids,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    let response = user_to_response(&state, &user).await?;

    tracing::info!(user_id = user.id, username = %user.username, admin_id = admin.user_id, "User created");
    record_audit(
        &state,
        admin.user_id,
        action_types::ENTITY_CREATE,
        "user",
        user.id,
        serde_json::json!({ "username": user.username, "roles": input.roles }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/admin/users
///
/// List all users with their resolved role sets.
pub async fn list_users(
    RequireUserAdmin(_admin): RequireUserAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;

    // Resolve all role sets in one query to avoid N+1.
    let ids: Vec<DbId> = users.iter().map(|u| u.id).collect();
    let mut role_map = RoleRepo::names_for_users(&state.pool, &ids).await?;

    let responses: Vec<UserResponse> = users
        .iter()
        .map(|u| build_user_response(u, role_map.remove(&u.id).unwrap_or_default()))
        .collect();

    Ok(Json(DataResponse { data: responses }))
}

/// GET /api/v1/admin/users/{id}
///
/// Get a single user by ID.
pub async fn get_user(
    RequireUserAdmin(_admin): RequireUserAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let response = user_to_response(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update a user's profile fields and/or replace their role set.
pub async fn update_user(
    RequireUserAdmin(admin): RequireUserAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role_ids = match &input.roles {
        Some(names) => Some(resolve_role_names(&state, names).await?),
        None => None,
    };

    let update_dto = UpdateUser {
        username: input.username,
        email: input.email,
        location_id: input.location_id,
        manager_id: input.manager_id,
        is_active: input.is_active,
        role_ids,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    record_audit(
        &state,
        admin.user_id,
        action_types::ENTITY_UPDATE,
        "user",
        id,
        serde_json::json!({ "roles": input.roles }),
    )
    .await;

    let response = user_to_response(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate a user and revoke their sessions. Returns 204.
pub async fn deactivate_user(
    RequireUserAdmin(admin): RequireUserAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    record_audit(
        &state,
        admin.user_id,
        action_types::ENTITY_DELETE,
        "user",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Admin-initiated password reset. Existing sessions are revoked.
pub async fn reset_password(
    RequireUserAdmin(admin): RequireUserAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)?;
    let hashed = hash_password(&input.new_password)?;

    let updated = UserRepo::update_password(&state.pool, id, &hashed).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "Password reset");
    record_audit(
        &state,
        admin.user_id,
        action_types::ENTITY_UPDATE,
        "user",
        id,
        serde_json::json!({ "password_reset": true }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate role names against the known set and resolve them to ids.
async fn resolve_role_names(state: &AppState, names: &[String]) -> AppResult<Vec<DbId>> {
    if names.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one role is required".into(),
        )));
    }
    for name in names {
        if Role::parse(name).is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role '{name}'"
            ))));
        }
    }
    let ids = RoleRepo::ids_for_names(&state.pool, names).await?;
    if ids.len() != names.len() {
        // Every name parsed as a known role, so a shorter id list means the
        // request repeated a role.
        return Err(AppError::Core(CoreError::Validation(
            "Duplicate role names in request".into(),
        )));
    }
    Ok(ids)
}

/// Convert a [`User`] row into a safe [`UserResponse`] by resolving roles.
async fn user_to_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let roles = RoleRepo::names_for_user(&state.pool, user.id).await?;
    Ok(build_user_response(user, roles))
}

/// Build a [`UserResponse`] from a [`User`] and a pre-resolved role set.
fn build_user_response(user: &User, roles: Vec<String>) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        roles,
        is_active: user.is_active,
        location_id: user.location_id,
        manager_id: user.manager_id,
        last_login_at: user.last_login_at,
        created_at: user.created_at,
    }
}
