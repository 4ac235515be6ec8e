//! Repository for the `roles` lookup table and user-role resolution.

use std::collections::HashMap;

use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

/// Provides read access to roles and the user-role mapping.
pub struct RoleRepo;

impl RoleRepo {
    /// List all roles.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Resolve role ids from role names. Unknown names are ignored.
    pub async fn ids_for_names(pool: &PgPool, names: &[String]) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM roles WHERE name = ANY($1)")
            .bind(names)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Role names held by a single user, ordered by role id.
    pub async fn names_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 \
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Role names for a set of users in one query, keyed by user id.
    /// Users without roles are absent from the map.
    pub async fn names_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<String>>, sqlx::Error> {
        let rows: Vec<(DbId, String)> = sqlx::query_as(
            "SELECT ur.user_id, r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ANY($1) \
             ORDER BY ur.user_id, r.id",
        )
        .bind(user_ids)
        .fetch_all(pool)
        .await?;

        let mut map: HashMap<DbId, Vec<String>> = HashMap::new();
        for (user_id, name) in rows {
            map.entry(user_id).or_default().push(name);
        }
        Ok(map)
    }
}
