//! Repository for asset instances.
//!
//! Allocation state (`status_id` = Allocated, `allocated_to`) is only ever
//! written by the allocation and retrieval repositories, which hold the
//! guarded transitions. The generic `update` here refuses to touch it.

use std::collections::HashSet;

use inventra_core::importer::ImportedAsset;
use inventra_core::status::{AssetStatus, StatusId};
use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset_definition::{
    AssetDefinition, AssetDefinitionWithNames, AssetSearchParams, CreateAssetDefinition,
    UpdateAssetDefinition,
};
use crate::repositories::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, asset_type_id, asset_code, name, asset_value, \
                       current_depreciation_value, purchase_date, status_id, \
                       assigned_asset_manager_id, location_id, allocated_to, remarks, \
                       created_at, updated_at";

/// Default page size for asset listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for asset listing.
const MAX_LIMIT: i64 = 200;

/// Provides CRUD operations for asset definitions.
pub struct AssetDefinitionRepo;

impl AssetDefinitionRepo {
    /// Register a new asset. New assets always start Available.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssetDefinition,
        current_depreciation_value: Option<rust_decimal::Decimal>,
    ) -> Result<AssetDefinition, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_definitions (\
                asset_type_id, asset_code, name, asset_value, current_depreciation_value, \
                purchase_date, assigned_asset_manager_id, location_id, remarks\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetDefinition>(&query)
            .bind(input.asset_type_id)
            .bind(&input.asset_code)
            .bind(&input.name)
            .bind(input.asset_value)
            .bind(current_depreciation_value)
            .bind(input.purchase_date)
            .bind(input.assigned_asset_manager_id)
            .bind(input.location_id)
            .bind(input.remarks.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetDefinition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_definitions WHERE id = $1");
        sqlx::query_as::<_, AssetDefinition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search assets with optional filters and pagination, enriched with
    /// resolved type/status/location names.
    pub async fn search(
        pool: &PgPool,
        params: &AssetSearchParams,
    ) -> Result<Vec<AssetDefinitionWithNames>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let (where_clause, bind_idx) = Self::search_conditions(params);
        let query = format!(
            "{select} {where_clause} \
             ORDER BY a.asset_code \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            select = Self::SEARCH_SELECT,
            next_idx = bind_idx + 1,
        );

        let q = Self::bind_search(sqlx::query_as::<_, AssetDefinitionWithNames>(&query), params)
            .bind(limit)
            .bind(offset);
        q.fetch_all(pool).await
    }

    /// Same filters as [`Self::search`], without pagination. Used by the
    /// CSV export.
    pub async fn export(
        pool: &PgPool,
        params: &AssetSearchParams,
    ) -> Result<Vec<AssetDefinitionWithNames>, sqlx::Error> {
        let (where_clause, _) = Self::search_conditions(params);
        let query = format!(
            "{select} {where_clause} ORDER BY a.asset_code",
            select = Self::SEARCH_SELECT,
        );

        let q = Self::bind_search(sqlx::query_as::<_, AssetDefinitionWithNames>(&query), params);
        q.fetch_all(pool).await
    }

    /// Shared SELECT head for search/export queries.
    const SEARCH_SELECT: &'static str = "SELECT \
            a.id, a.asset_type_id, a.asset_code, a.name, a.asset_value, \
            a.current_depreciation_value, a.purchase_date, a.status_id, \
            a.assigned_asset_manager_id, a.location_id, a.allocated_to, a.remarks, \
            a.created_at, a.updated_at, \
            at.name AS type_name, \
            at.code AS type_code, \
            ast.name AS status_name, \
            l.name AS location_name \
         FROM asset_definitions a \
         JOIN asset_types at ON at.id = a.asset_type_id \
         JOIN asset_statuses ast ON ast.id = a.status_id \
         LEFT JOIN locations l ON l.id = a.location_id";

    /// Build the dynamic WHERE clause; returns it with the next bind index.
    fn search_conditions(params: &AssetSearchParams) -> (String, u32) {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.search.is_some() {
            conditions.push(format!(
                "(a.asset_code ILIKE ${bind_idx} OR a.name ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.asset_type_id.is_some() {
            conditions.push(format!("a.asset_type_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.status_id.is_some() {
            conditions.push(format!("a.status_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.location_id.is_some() {
            conditions.push(format!("a.location_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.allocated_to.is_some() {
            conditions.push(format!("a.allocated_to = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (where_clause, bind_idx)
    }

    /// Bind the dynamic search parameters in clause order.
    fn bind_search<'q>(
        mut q: sqlx::query::QueryAs<
            'q,
            sqlx::Postgres,
            AssetDefinitionWithNames,
            sqlx::postgres::PgArguments,
        >,
        params: &'q AssetSearchParams,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, AssetDefinitionWithNames, sqlx::postgres::PgArguments>
    {
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(type_id) = params.asset_type_id {
            q = q.bind(type_id);
        }
        if let Some(status_id) = params.status_id {
            q = q.bind(status_id);
        }
        if let Some(location_id) = params.location_id {
            q = q.bind(location_id);
        }
        if let Some(allocated_to) = params.allocated_to {
            q = q.bind(allocated_to);
        }
        q
    }

    /// Update mutable fields. Allocation state is out of reach: status may
    /// only move between the non-allocated statuses here, and a currently
    /// allocated asset rejects status changes entirely (0 rows updated).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssetDefinition,
        current_depreciation_value: Option<rust_decimal::Decimal>,
    ) -> Result<Option<AssetDefinition>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_definitions SET \
                name = COALESCE($2, name), \
                asset_value = COALESCE($3, asset_value), \
                purchase_date = COALESCE($4, purchase_date), \
                status_id = COALESCE($5, status_id), \
                assigned_asset_manager_id = COALESCE($6, assigned_asset_manager_id), \
                location_id = COALESCE($7, location_id), \
                remarks = COALESCE($8, remarks), \
                current_depreciation_value = COALESCE($9, current_depreciation_value) \
             WHERE id = $1 \
               AND status_id <> $10 \
               AND ($5 IS NULL OR $5 <> $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetDefinition>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.asset_value)
            .bind(input.purchase_date)
            .bind(input.status_id)
            .bind(input.assigned_asset_manager_id)
            .bind(input.location_id)
            .bind(input.remarks.as_deref())
            .bind(current_depreciation_value)
            .bind(AssetStatus::Allocated.id())
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset that has never been allocated. Returns true if a row
    /// was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM asset_definitions WHERE id = $1 AND status_id <> $2 \
             AND NOT EXISTS (SELECT 1 FROM allocations WHERE asset_definition_id = $1)",
        )
        .bind(id)
        .bind(AssetStatus::Allocated.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assets currently allocated to an employee, optionally restricted to
    /// types recovered on separation.
    pub async fn allocated_to_employee(
        pool: &PgPool,
        employee_id: DbId,
        recoverable_only: bool,
    ) -> Result<Vec<AssetDefinition>, sqlx::Error> {
        let mut query = String::from(
            "SELECT \
                a.id, a.asset_type_id, a.asset_code, a.name, a.asset_value, \
                a.current_depreciation_value, a.purchase_date, a.status_id, \
                a.assigned_asset_manager_id, a.location_id, a.allocated_to, a.remarks, \
                a.created_at, a.updated_at \
             FROM asset_definitions a \
             JOIN asset_types at ON at.id = a.asset_type_id \
             WHERE a.allocated_to = $1 AND a.status_id = $2",
        );
        if recoverable_only {
            query.push_str(" AND at.to_be_recovered_on_separation");
        }
        query.push_str(" ORDER BY a.asset_code");

        sqlx::query_as::<_, AssetDefinition>(&query)
            .bind(employee_id)
            .bind(AssetStatus::Allocated.id())
            .fetch_all(pool)
            .await
    }

    /// All registered asset codes, for duplicate checking during import.
    pub async fn all_codes(pool: &PgPool) -> Result<HashSet<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT asset_code FROM asset_definitions")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(code,)| code).collect())
    }

    /// Insert one validated import row. Kept separate from `create` so the
    /// import handler can insert row-by-row and count failures.
    pub async fn insert_imported(
        pool: &PgPool,
        row: &ImportedAsset,
        assigned_asset_manager_id: Option<DbId>,
        current_depreciation_value: Option<rust_decimal::Decimal>,
    ) -> Result<AssetDefinition, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_definitions (\
                asset_type_id, asset_code, name, asset_value, current_depreciation_value, \
                purchase_date, assigned_asset_manager_id, location_id, remarks\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetDefinition>(&query)
            .bind(row.asset_type_id)
            .bind(&row.asset_code)
            .bind(&row.name)
            .bind(row.asset_value)
            .bind(current_depreciation_value)
            .bind(row.purchase_date)
            .bind(assigned_asset_manager_id)
            .bind(row.location_id)
            .bind(row.remarks.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Count assets per status for a quick stock overview.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(StatusId, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT status_id, COUNT(*) FROM asset_definitions GROUP BY status_id ORDER BY status_id",
        )
        .fetch_all(pool)
        .await
    }
}
