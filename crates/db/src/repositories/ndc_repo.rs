//! Repository for No-Dues-Certificate requests.

use inventra_core::error::CoreError;
use inventra_core::ndc;
use inventra_core::status::{AssetStatus, NdcStatus};
use inventra_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::ndc::{CreateNdcRequest, NdcListParams, NdcRequest};
use crate::models::retrieval::Retrieval;
use crate::repositories::retrieval_repo::RetrievalRepo;
use crate::repositories::{clamp_limit, clamp_offset, RepoError};

const COLUMNS: &str = "id, employee_id, resigned_on, notice_period_days, last_working_date, \
                       separation_approved_by, separation_reason_id, status_id, \
                       revoked_by, revoke_reason, revoked_at, created_at, updated_at";

/// Default page size for NDC listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for NDC listing.
const MAX_LIMIT: i64 = 200;

/// An NDC request together with the retrieval obligations it spawned.
#[derive(Debug, serde::Serialize)]
pub struct NdcWithRetrievals {
    #[serde(flatten)]
    pub ndc: NdcRequest,
    pub retrievals: Vec<Retrieval>,
}

/// Provides NDC lifecycle operations.
pub struct NdcRepo;

impl NdcRepo {
    /// Open an NDC request for a separating employee.
    ///
    /// Atomically creates the request and one retrieval obligation per
    /// asset currently allocated to the employee whose type is recovered on
    /// separation. An employee with nothing to recover gets a Completed NDC
    /// immediately.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNdcRequest,
    ) -> Result<NdcWithRetrievals, RepoError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO ndc_requests (\
                employee_id, resigned_on, notice_period_days, last_working_date, \
                separation_approved_by, separation_reason_id\
             ) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, NdcRequest>(&query)
            .bind(input.employee_id)
            .bind(input.resigned_on)
            .bind(input.notice_period_days)
            .bind(input.last_working_date)
            .bind(input.separation_approved_by)
            .bind(input.separation_reason_id)
            .fetch_one(&mut *tx)
            .await?;

        // Every recoverable asset still with the employee becomes an
        // obligation.
        let assets: Vec<(DbId,)> = sqlx::query_as(
            "SELECT a.id FROM asset_definitions a \
             JOIN asset_types at ON at.id = a.asset_type_id \
             WHERE a.allocated_to = $1 AND a.status_id = $2 \
               AND at.to_be_recovered_on_separation \
             ORDER BY a.asset_code",
        )
        .bind(input.employee_id)
        .bind(AssetStatus::Allocated.id())
        .fetch_all(&mut *tx)
        .await?;

        let mut retrievals = Vec::with_capacity(assets.len());
        for (asset_id,) in &assets {
            let retrieval =
                RetrievalRepo::create_for_ndc(&mut tx, input.employee_id, *asset_id, created.id)
                    .await?;
            retrievals.push(retrieval);
        }

        let ndc = if retrievals.is_empty() {
            let query = format!(
                "UPDATE ndc_requests SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, NdcRequest>(&query)
                .bind(created.id)
                .bind(NdcStatus::Completed.id())
                .fetch_one(&mut *tx)
                .await?
        } else {
            created
        };

        tx.commit().await?;
        Ok(NdcWithRetrievals { ndc, retrievals })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NdcRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ndc_requests WHERE id = $1");
        sqlx::query_as::<_, NdcRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List NDC requests with optional filters, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &NdcListParams,
    ) -> Result<Vec<NdcRequest>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.employee_id.is_some() {
            conditions.push(format!("employee_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.status_id.is_some() {
            conditions.push(format!("status_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM ndc_requests {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, NdcRequest>(&query);
        if let Some(employee_id) = params.employee_id {
            q = q.bind(employee_id);
        }
        if let Some(status_id) = params.status_id {
            q = q.bind(status_id);
        }
        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// Revoke a non-terminal NDC request with a mandatory reason.
    ///
    /// Still-open retrieval obligations are deleted: the employee is not
    /// separating after all. Completed retrievals stay -- the assets really
    /// did come back.
    pub async fn revoke(
        pool: &PgPool,
        id: DbId,
        actor: DbId,
        reason: &str,
    ) -> Result<NdcRequest, RepoError> {
        let existing = Self::find_by_id(pool, id).await?.ok_or(CoreError::NotFound {
            entity: "NDC request",
            id,
        })?;
        let status = NdcStatus::from_id(existing.status_id)
            .ok_or_else(|| CoreError::Internal(format!("Unknown NDC status id {}", existing.status_id)))?;
        ndc::validate_revoke(status, reason)?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE ndc_requests SET \
                status_id = $3, \
                revoked_by = $4, \
                revoke_reason = $5, \
                revoked_at = NOW() \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        let revoked = sqlx::query_as::<_, NdcRequest>(&query)
            .bind(id)
            .bind(status.id())
            .bind(NdcStatus::Revoked.id())
            .bind(actor)
            .bind(reason)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                RepoError::from(CoreError::Conflict(
                    "NDC request was modified concurrently; refresh and retry".into(),
                ))
            })?;

        sqlx::query("DELETE FROM retrievals WHERE ndc_request_id = $1 AND NOT recovered")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(revoked)
    }

    /// Recompute an NDC's status from its linked retrievals, inside the
    /// caller's transaction. Terminal NDCs are left untouched.
    pub(crate) async fn recompute_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        ndc_id: DbId,
    ) -> Result<NdcStatus, RepoError> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE recovered) \
             FROM retrievals WHERE ndc_request_id = $1",
        )
        .bind(ndc_id)
        .fetch_one(&mut **tx)
        .await?;

        let next = ndc::derive_status(counts.0, counts.1);

        sqlx::query(
            "UPDATE ndc_requests SET status_id = $2 \
             WHERE id = $1 AND status_id NOT IN ($3, $4)",
        )
        .bind(ndc_id)
        .bind(next.id())
        .bind(NdcStatus::Completed.id())
        .bind(NdcStatus::Revoked.id())
        .execute(&mut **tx)
        .await?;

        Ok(next)
    }
}
