//! Repository for retrievals: recovering allocated assets from employees.

use inventra_core::error::CoreError;
use inventra_core::retrieval;
use inventra_core::status::{AssetStatus, NdcStatus};
use inventra_core::types::{Date, DbId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::retrieval::{
    CreateRetrieval, Retrieval, RetrievalListParams, RetrievalWithNames, UpdateRetrieval,
};
use crate::repositories::ndc_repo::NdcRepo;
use crate::repositories::{clamp_limit, clamp_offset, RepoError};

const COLUMNS: &str = "id, employee_id, asset_definition_id, ndc_request_id, recovered, \
                       asset_condition, returned_on, recovery_value, remarks, \
                       created_at, updated_at";

/// Default page size for retrieval listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for retrieval listing.
const MAX_LIMIT: i64 = 200;

/// Provides the retrieval tracker.
pub struct RetrievalRepo;

impl RetrievalRepo {
    /// Open an ad-hoc retrieval. Valid only if the asset is currently
    /// allocated to that employee.
    pub async fn create(pool: &PgPool, input: &CreateRetrieval) -> Result<Retrieval, RepoError> {
        let allocated: Option<(Option<DbId>, i16)> = sqlx::query_as(
            "SELECT allocated_to, status_id FROM asset_definitions WHERE id = $1",
        )
        .bind(input.asset_definition_id)
        .fetch_optional(pool)
        .await?;

        let (allocated_to, status_id) = allocated.ok_or(CoreError::NotFound {
            entity: "Asset definition",
            id: input.asset_definition_id,
        })?;

        if status_id != AssetStatus::Allocated.id() || allocated_to != Some(input.employee_id) {
            return Err(CoreError::Validation(format!(
                "Asset {} is not currently allocated to employee {}",
                input.asset_definition_id, input.employee_id
            ))
            .into());
        }

        let query = format!(
            "INSERT INTO retrievals (employee_id, asset_definition_id, remarks) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Retrieval>(&query)
            .bind(input.employee_id)
            .bind(input.asset_definition_id)
            .bind(input.remarks.as_deref())
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// Insert a retrieval obligation inside an NDC-creation transaction.
    pub(crate) async fn create_for_ndc(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: DbId,
        asset_definition_id: DbId,
        ndc_request_id: DbId,
    ) -> Result<Retrieval, sqlx::Error> {
        let query = format!(
            "INSERT INTO retrievals (employee_id, asset_definition_id, ndc_request_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Retrieval>(&query)
            .bind(employee_id)
            .bind(asset_definition_id)
            .bind(ndc_request_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Retrieval>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM retrievals WHERE id = $1");
        sqlx::query_as::<_, Retrieval>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply an update to a retrieval.
    ///
    /// Plain remark edits go straight through. A `recovered: true` update
    /// is the completion path: validated in core, applied as a guarded
    /// update (`recovered = false` rows only, so completion happens once),
    /// then the asset is released per its condition, the active allocation
    /// is closed, and the owning NDC (if any) is recomputed -- one
    /// transaction for all of it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRetrieval,
        today: Date,
    ) -> Result<Retrieval, RepoError> {
        let existing = Self::find_by_id(pool, id).await?.ok_or(CoreError::NotFound {
            entity: "Retrieval",
            id,
        })?;

        if input.recovered != Some(true) {
            if existing.recovered {
                return Err(CoreError::Conflict(
                    "Retrieval is already completed and can no longer be edited".into(),
                )
                .into());
            }
            let query = format!(
                "UPDATE retrievals SET remarks = COALESCE($2, remarks) \
                 WHERE id = $1 \
                 RETURNING {COLUMNS}"
            );
            let updated = sqlx::query_as::<_, Retrieval>(&query)
                .bind(id)
                .bind(input.remarks.as_deref())
                .fetch_one(pool)
                .await?;
            return Ok(updated);
        }

        retrieval::validate_completion(input.asset_condition.as_deref(), input.recovery_value)?;
        // validate_completion guarantees the condition is present and valid.
        let condition = input.asset_condition.as_deref().ok_or_else(|| {
            CoreError::Internal("asset_condition missing after validation".into())
        })?;
        let returned_on = input.returned_on.unwrap_or(today);

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE retrievals SET \
                recovered = TRUE, \
                asset_condition = $2, \
                returned_on = $3, \
                recovery_value = $4, \
                remarks = COALESCE($5, remarks) \
             WHERE id = $1 AND NOT recovered \
             RETURNING {COLUMNS}"
        );
        let completed = sqlx::query_as::<_, Retrieval>(&query)
            .bind(id)
            .bind(condition)
            .bind(returned_on)
            .bind(input.recovery_value)
            .bind(input.remarks.as_deref())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                RepoError::from(CoreError::Conflict(
                    "Retrieval has already been completed".into(),
                ))
            })?;

        // Release the asset: out of Allocated, per the recorded condition.
        let next_asset_status = retrieval::asset_status_after_return(condition);
        sqlx::query(
            "UPDATE asset_definitions SET status_id = $2, allocated_to = NULL \
             WHERE id = $1 AND status_id = $3 AND allocated_to = $4",
        )
        .bind(completed.asset_definition_id)
        .bind(next_asset_status.id())
        .bind(AssetStatus::Allocated.id())
        .bind(completed.employee_id)
        .execute(&mut *tx)
        .await?;

        // Close the employee's active allocation of this asset, if present.
        let next_allocation_status = retrieval::allocation_status_after_return(condition);
        sqlx::query(
            "UPDATE allocations SET status_id = $3 \
             WHERE asset_definition_id = $1 AND allocated_to = $2 AND status_id = $4",
        )
        .bind(completed.asset_definition_id)
        .bind(completed.employee_id)
        .bind(next_allocation_status.id())
        .bind(inventra_core::status::AllocationStatus::AllocatedToEmployee.id())
        .execute(&mut *tx)
        .await?;

        // Progress the owning NDC as its obligations resolve.
        let mut ndc_completed = None;
        if let Some(ndc_id) = completed.ndc_request_id {
            let status = NdcRepo::recompute_status_tx(&mut tx, ndc_id).await?;
            if status == NdcStatus::Completed {
                ndc_completed = Some(ndc_id);
            }
        }

        tx.commit().await?;

        if let Some(ndc_id) = ndc_completed {
            tracing::info!(ndc_request_id = ndc_id, "NDC request completed");
        }

        Ok(completed)
    }

    /// List retrievals with optional filters, newest first, enriched with
    /// asset and employee names.
    pub async fn list(
        pool: &PgPool,
        params: &RetrievalListParams,
    ) -> Result<Vec<RetrievalWithNames>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.employee_id.is_some() {
            conditions.push(format!("r.employee_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.ndc_request_id.is_some() {
            conditions.push(format!("r.ndc_request_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.recovered.is_some() {
            conditions.push(format!("r.recovered = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT \
                r.id, r.employee_id, r.asset_definition_id, r.ndc_request_id, r.recovered, \
                r.asset_condition, r.returned_on, r.recovery_value, r.remarks, r.created_at, \
                a.asset_code, \
                a.name AS asset_name, \
                u.username AS employee_username \
             FROM retrievals r \
             JOIN asset_definitions a ON a.id = r.asset_definition_id \
             JOIN users u ON u.id = r.employee_id \
             {where_clause} \
             ORDER BY r.created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, RetrievalWithNames>(&query);
        if let Some(employee_id) = params.employee_id {
            q = q.bind(employee_id);
        }
        if let Some(ndc_id) = params.ndc_request_id {
            q = q.bind(ndc_id);
        }
        if let Some(recovered) = params.recovered {
            q = q.bind(recovered);
        }
        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// All retrievals linked to an NDC request.
    pub async fn list_for_ndc(pool: &PgPool, ndc_id: DbId) -> Result<Vec<Retrieval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM retrievals WHERE ndc_request_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Retrieval>(&query)
            .bind(ndc_id)
            .fetch_all(pool)
            .await
    }
}
