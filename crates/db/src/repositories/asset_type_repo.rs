//! Repository for the asset type catalog.

use std::collections::HashMap;

use inventra_core::status::AssetTypeStatus;
use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset_type::{AssetType, CreateAssetType, UpdateAssetType};

const COLUMNS: &str = "id, code, name, description, depreciation_applicable, \
                       asset_life_months, to_be_recovered_on_separation, \
                       assigned_asset_manager_id, status_id, created_at, updated_at";

/// Provides CRUD operations for asset types.
pub struct AssetTypeRepo;

impl AssetTypeRepo {
    pub async fn create(pool: &PgPool, input: &CreateAssetType) -> Result<AssetType, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_types (\
                code, name, description, depreciation_applicable, asset_life_months, \
                to_be_recovered_on_separation, assigned_asset_manager_id\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetType>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.depreciation_applicable)
            .bind(input.asset_life_months)
            .bind(input.to_be_recovered_on_separation)
            .bind(input.assigned_asset_manager_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_types WHERE id = $1");
        sqlx::query_as::<_, AssetType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<AssetType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_types WHERE code = $1");
        sqlx::query_as::<_, AssetType>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List asset types, optionally restricted to active ones.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<AssetType>, sqlx::Error> {
        let query = if active_only {
            format!(
                "SELECT {COLUMNS} FROM asset_types WHERE status_id = $1 ORDER BY name"
            )
        } else {
            format!("SELECT {COLUMNS} FROM asset_types ORDER BY name")
        };
        let mut q = sqlx::query_as::<_, AssetType>(&query);
        if active_only {
            q = q.bind(AssetTypeStatus::Active.id());
        }
        q.fetch_all(pool).await
    }

    /// Update an asset type. The code is immutable once created.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssetType,
    ) -> Result<Option<AssetType>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_types SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                depreciation_applicable = COALESCE($4, depreciation_applicable), \
                asset_life_months = COALESCE($5, asset_life_months), \
                to_be_recovered_on_separation = COALESCE($6, to_be_recovered_on_separation), \
                assigned_asset_manager_id = COALESCE($7, assigned_asset_manager_id), \
                status_id = COALESCE($8, status_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetType>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.depreciation_applicable)
            .bind(input.asset_life_months)
            .bind(input.to_be_recovered_on_separation)
            .bind(input.assigned_asset_manager_id)
            .bind(input.status_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear the assigned asset manager (cannot be expressed through the
    /// COALESCE-based update).
    pub async fn clear_assigned_manager(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE asset_types SET assigned_asset_manager_id = NULL WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Map active asset type codes to ids, for bulk import resolution.
    pub async fn codes_to_ids(pool: &PgPool) -> Result<HashMap<String, DbId>, sqlx::Error> {
        let rows: Vec<(String, DbId)> =
            sqlx::query_as("SELECT code, id FROM asset_types WHERE status_id = $1")
                .bind(AssetTypeStatus::Active.id())
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    /// Number of asset definitions registered against a type.
    pub async fn count_definitions(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM asset_definitions WHERE asset_type_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }
}
