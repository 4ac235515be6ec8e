//! User entity model and DTOs.

use inventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub location_id: Option<DbId>,
    pub manager_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash), with the
/// resolved role set.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// Role names held by the user (e.g. `["employee", "asset_manager"]`).
    pub roles: Vec<String>,
    pub is_active: bool,
    pub location_id: Option<DbId>,
    pub manager_id: Option<DbId>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub location_id: Option<DbId>,
    pub manager_id: Option<DbId>,
    pub role_ids: Vec<DbId>,
}

/// DTO for updating an existing user. All fields are optional; `role_ids`
/// replaces the full role set when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub location_id: Option<DbId>,
    pub manager_id: Option<DbId>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<DbId>>,
}
