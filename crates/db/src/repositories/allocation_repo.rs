//! Repository for allocations: the binder that matches an approved
//! requisition to a concrete asset, and the acknowledgment sub-flow.

use inventra_core::allocation;
use inventra_core::error::CoreError;
use inventra_core::requisition::RequestFor;
use inventra_core::status::{AllocationStatus, AssetStatus, RequisitionStatus};
use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::allocation::{
    Allocation, AllocationListParams, AllocationMetadata, AllocationWithAsset,
};
use crate::repositories::{clamp_limit, clamp_offset, RepoError};

const COLUMNS: &str = "id, requisition_id, asset_definition_id, allocated_to, allocated_by, \
                       allocated_date, status_id, reference_id, document_id, dispatch_details, \
                       remarks, acknowledged, acknowledgment_date, acknowledgment_notes, \
                       created_at, updated_at";

/// Default page size for allocation listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for allocation listing.
const MAX_LIMIT: i64 = 200;

/// Provides the allocation binder and allocation queries.
pub struct AllocationRepo;

impl AllocationRepo {
    /// Bind an available asset to a requisition awaiting allocation.
    ///
    /// Atomic: creates the allocation record, marks the asset Allocated,
    /// and advances the requisition -- or none of it. The asset update is
    /// guarded on `status = Available` so two allocations of the same asset
    /// cannot both succeed; the requisition update is guarded on
    /// `status = AssignedForAllocation` so a requisition is allocated at
    /// most once.
    pub async fn allocate(
        pool: &PgPool,
        requisition_id: DbId,
        asset_definition_id: DbId,
        allocated_by: DbId,
        metadata: &AllocationMetadata,
    ) -> Result<Allocation, RepoError> {
        let mut tx = pool.begin().await?;

        // Lock the requisition row for the duration of the binding.
        let req: Option<(i16, DbId, String, DbId, Option<DbId>)> = sqlx::query_as(
            "SELECT status_id, asset_type_id, request_for, requested_by, team_member_id \
             FROM requisitions WHERE id = $1 FOR UPDATE",
        )
        .bind(requisition_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status_id, req_asset_type_id, request_for, requested_by, team_member_id) =
            req.ok_or(CoreError::NotFound {
                entity: "Requisition",
                id: requisition_id,
            })?;

        let status = RequisitionStatus::from_id(status_id).ok_or_else(|| {
            CoreError::Internal(format!("Unknown requisition status id {status_id}"))
        })?;
        if status != RequisitionStatus::AssignedForAllocation {
            return Err(CoreError::stale_status(
                "Requisition",
                RequisitionStatus::AssignedForAllocation.name(),
                status.name(),
            )
            .into());
        }

        // Type compatibility is a hard constraint.
        let asset: Option<(DbId,)> =
            sqlx::query_as("SELECT asset_type_id FROM asset_definitions WHERE id = $1")
                .bind(asset_definition_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (asset_type_id,) = asset.ok_or(CoreError::NotFound {
            entity: "Asset definition",
            id: asset_definition_id,
        })?;
        allocation::check_type_compatibility(req_asset_type_id, asset_type_id)?;

        let request_for = RequestFor::parse(&request_for)?;
        let recipient = allocation::recipient_for(request_for, requested_by, team_member_id)?;

        // Claim the asset. Guarded on Available: zero rows means a
        // concurrent allocation (or a non-available asset) won the race.
        let claimed = sqlx::query(
            "UPDATE asset_definitions SET status_id = $2, allocated_to = $3 \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(asset_definition_id)
        .bind(AssetStatus::Allocated.id())
        .bind(recipient)
        .bind(AssetStatus::Available.id())
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Err(CoreError::Conflict(
                "Asset is no longer available for allocation".into(),
            )
            .into());
        }

        let query = format!(
            "INSERT INTO allocations (\
                requisition_id, asset_definition_id, allocated_to, allocated_by, status_id, \
                reference_id, document_id, dispatch_details, remarks\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Allocation>(&query)
            .bind(requisition_id)
            .bind(asset_definition_id)
            .bind(recipient)
            .bind(allocated_by)
            .bind(AllocationStatus::AllocatedToEmployee.id())
            .bind(metadata.reference_id.as_deref())
            .bind(metadata.document_id.as_deref())
            .bind(metadata.dispatch_details.as_deref())
            .bind(metadata.remarks.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        // Close the requisition. The row is locked, so this guard can only
        // fail if our own view was stale -- treated as a conflict all the same.
        let advanced = sqlx::query(
            "UPDATE requisitions SET status_id = $2 WHERE id = $1 AND status_id = $3",
        )
        .bind(requisition_id)
        .bind(RequisitionStatus::Allocated.id())
        .bind(RequisitionStatus::AssignedForAllocation.id())
        .execute(&mut *tx)
        .await?;
        if advanced.rows_affected() == 0 {
            return Err(CoreError::Conflict(
                "Requisition was modified concurrently during allocation".into(),
            )
            .into());
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Allocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM allocations WHERE id = $1");
        sqlx::query_as::<_, Allocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Recipient confirms receipt of the asset. One-shot: a second
    /// acknowledgment is a conflict, and only the recipient may confirm.
    pub async fn acknowledge(
        pool: &PgPool,
        id: DbId,
        actor: DbId,
        notes: Option<&str>,
    ) -> Result<Allocation, RepoError> {
        let existing = Self::find_by_id(pool, id).await?.ok_or(CoreError::NotFound {
            entity: "Allocation",
            id,
        })?;
        allocation::can_acknowledge(existing.allocated_to, actor, existing.acknowledged)?;

        let query = format!(
            "UPDATE allocations SET \
                acknowledged = TRUE, \
                acknowledgment_date = NOW(), \
                acknowledgment_notes = $3 \
             WHERE id = $1 AND allocated_to = $2 AND NOT acknowledged \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Allocation>(&query)
            .bind(id)
            .bind(actor)
            .bind(notes)
            .fetch_optional(pool)
            .await?;

        updated.ok_or_else(|| {
            CoreError::Conflict("Allocation has already been acknowledged".into()).into()
        })
    }

    /// List allocations with optional filters, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &AllocationListParams,
    ) -> Result<Vec<Allocation>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.allocated_to.is_some() {
            conditions.push(format!("allocated_to = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.asset_definition_id.is_some() {
            conditions.push(format!("asset_definition_id = ${bind_idx}"));
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
            "SELECT {COLUMNS} FROM allocations {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Allocation>(&query);
        if let Some(allocated_to) = params.allocated_to {
            q = q.bind(allocated_to);
        }
        if let Some(asset_id) = params.asset_definition_id {
            q = q.bind(asset_id);
        }
        if let Some(status_id) = params.status_id {
            q = q.bind(status_id);
        }
        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// A user's allocations with asset details, for the "my assets" view.
    /// Unacknowledged allocations sort first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AllocationWithAsset>, sqlx::Error> {
        sqlx::query_as::<_, AllocationWithAsset>(
            "SELECT \
                al.id, al.requisition_id, al.asset_definition_id, al.allocated_to, \
                al.allocated_by, al.allocated_date, al.status_id, al.acknowledged, \
                al.acknowledgment_date, al.created_at, \
                a.asset_code, \
                a.name AS asset_name, \
                at.name AS asset_type_name, \
                als.name AS status_name \
             FROM allocations al \
             JOIN asset_definitions a ON a.id = al.asset_definition_id \
             JOIN asset_types at ON at.id = a.asset_type_id \
             JOIN allocation_statuses als ON als.id = al.status_id \
             WHERE al.allocated_to = $1 \
             ORDER BY al.acknowledged, al.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// The active (still with the employee) allocation of an asset, if any.
    pub async fn find_active_for_asset(
        pool: &PgPool,
        asset_definition_id: DbId,
    ) -> Result<Option<Allocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM allocations \
             WHERE asset_definition_id = $1 AND status_id = $2 \
             ORDER BY created_at DESC LIMIT 1"
        );
        sqlx::query_as::<_, Allocation>(&query)
            .bind(asset_definition_id)
            .bind(AllocationStatus::AllocatedToEmployee.id())
            .fetch_optional(pool)
            .await
    }
}
