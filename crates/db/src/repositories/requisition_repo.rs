//! Repository for requisitions and their approval workflow.
//!
//! Every status transition is a conditional UPDATE guarded on the expected
//! current status. Zero rows affected means another actor got there first
//! (or the requisition is gone); the caller receives a Conflict, never a
//! silent double-apply. The state graph itself lives in
//! `inventra_core::requisition`.

use inventra_core::error::CoreError;
use inventra_core::requisition::{self, ApprovalAction};
use inventra_core::routing;
use inventra_core::status::RequisitionStatus;
use inventra_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::requisition::{
    CreateRequisition, Requisition, RequisitionListParams, RequisitionWithNames,
};
use crate::repositories::{clamp_limit, clamp_offset, RepoError};

const COLUMNS: &str = "id, asset_type_id, request_type, requested_by, request_for, \
                       team_member_id, justification, reason_for_return_replacement, \
                       asset_details, required_by_date, status_id, assigned_to, \
                       routing_reason, manager_actioned_by, manager_action_reason, \
                       manager_actioned_at, hr_actioned_by, hr_action_reason, \
                       hr_actioned_at, created_at, updated_at";

/// Default page size for requisition listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for requisition listing.
const MAX_LIMIT: i64 = 200;

/// The result of an HR action, including the routing outcome when the
/// action was an approval.
#[derive(Debug)]
pub struct HrActionResult {
    pub requisition: Requisition,
    /// Present when the approval routed the requisition.
    pub routed: Option<routing::RoutingOutcome>,
}

/// Provides workflow and CRUD operations for requisitions.
pub struct RequisitionRepo;

impl RequisitionRepo {
    /// Insert a new requisition in Pending. Payload validation happens in
    /// the handler via `inventra_core::requisition::validate_new_requisition`.
    pub async fn create(
        pool: &PgPool,
        requested_by: DbId,
        input: &CreateRequisition,
    ) -> Result<Requisition, sqlx::Error> {
        let query = format!(
            "INSERT INTO requisitions (\
                asset_type_id, request_type, requested_by, request_for, team_member_id, \
                justification, reason_for_return_replacement, asset_details, required_by_date\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Requisition>(&query)
            .bind(input.asset_type_id)
            .bind(&input.request_type)
            .bind(requested_by)
            .bind(&input.request_for)
            .bind(input.team_member_id)
            .bind(&input.justification)
            .bind(input.reason_for_return_replacement.as_deref())
            .bind(input.asset_details.as_deref())
            .bind(input.required_by_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Requisition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requisitions WHERE id = $1");
        sqlx::query_as::<_, Requisition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requisitions with optional filters, newest first, enriched with
    /// resolved names.
    pub async fn list(
        pool: &PgPool,
        params: &RequisitionListParams,
    ) -> Result<Vec<RequisitionWithNames>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.status_id.is_some() {
            conditions.push(format!("r.status_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.asset_type_id.is_some() {
            conditions.push(format!("r.asset_type_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.requested_by.is_some() {
            conditions.push(format!("r.requested_by = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.assigned_to.is_some() {
            conditions.push(format!("r.assigned_to = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT \
                r.id, r.asset_type_id, r.request_type, r.requested_by, r.request_for, \
                r.team_member_id, r.justification, r.reason_for_return_replacement, \
                r.asset_details, r.required_by_date, r.status_id, r.assigned_to, \
                r.routing_reason, r.created_at, \
                at.name AS asset_type_name, \
                rs.name AS status_name, \
                u.username AS requested_by_username \
             FROM requisitions r \
             JOIN asset_types at ON at.id = r.asset_type_id \
             JOIN requisition_statuses rs ON rs.id = r.status_id \
             JOIN users u ON u.id = r.requested_by \
             {where_clause} \
             ORDER BY r.created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            where_clause = where_clause,
            bind_idx = bind_idx,
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, RequisitionWithNames>(&query);
        if let Some(status_id) = params.status_id {
            q = q.bind(status_id);
        }
        if let Some(type_id) = params.asset_type_id {
            q = q.bind(type_id);
        }
        if let Some(requested_by) = params.requested_by {
            q = q.bind(requested_by);
        }
        if let Some(assigned_to) = params.assigned_to {
            q = q.bind(assigned_to);
        }
        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// Apply a manager action (approve / reject / hold).
    ///
    /// The conditional UPDATE only matches rows still in Pending, so two
    /// concurrent manager actions cannot both succeed.
    pub async fn manager_action(
        pool: &PgPool,
        id: DbId,
        actor: DbId,
        action: ApprovalAction,
        reason: &str,
    ) -> Result<Requisition, RepoError> {
        let current = Self::status_of(pool, id).await?;
        let next = requisition::manager_transition(current, action)?;

        let query = format!(
            "UPDATE requisitions SET \
                status_id = $3, \
                manager_actioned_by = $4, \
                manager_action_reason = $5, \
                manager_actioned_at = NOW() \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Requisition>(&query)
            .bind(id)
            .bind(current.id())
            .bind(next.id())
            .bind(actor)
            .bind(reason)
            .fetch_optional(pool)
            .await?;

        updated.ok_or_else(|| Self::lost_race(current).into())
    }

    /// Apply an HR action (approve / reject / hold).
    ///
    /// An approval immediately routes the requisition to the asset type's
    /// assigned manager and advances it to AssignedForAllocation, all in one
    /// transaction: HrApproved is never left behind as a resting state.
    pub async fn hr_action(
        pool: &PgPool,
        id: DbId,
        actor: DbId,
        action: ApprovalAction,
        reason: &str,
    ) -> Result<HrActionResult, RepoError> {
        let mut tx = pool.begin().await?;

        // Lock the row so the status we validate against cannot move under
        // us between the read and the guarded update.
        let current = Self::status_of_for_update(&mut tx, id).await?;
        let next = requisition::hr_transition(current, action)?;

        let query = format!(
            "UPDATE requisitions SET \
                status_id = $3, \
                hr_actioned_by = $4, \
                hr_action_reason = $5, \
                hr_actioned_at = NOW() \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Requisition>(&query)
            .bind(id)
            .bind(current.id())
            .bind(next.id())
            .bind(actor)
            .bind(reason)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepoError::from(Self::lost_race(current)))?;

        if next != RequisitionStatus::HrApproved {
            tx.commit().await?;
            return Ok(HrActionResult {
                requisition: updated,
                routed: None,
            });
        }

        // Routing resolver: pick the asset manager configured on the asset
        // type and advance to AssignedForAllocation. Not actor-gated.
        let manager: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT assigned_asset_manager_id FROM asset_types WHERE id = $1")
                .bind(updated.asset_type_id)
                .fetch_optional(&mut *tx)
                .await?;
        let outcome = routing::resolve(manager.and_then(|(m,)| m));

        let query = format!(
            "UPDATE requisitions SET \
                status_id = $3, \
                assigned_to = $4, \
                routing_reason = $5 \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        let routed = sqlx::query_as::<_, Requisition>(&query)
            .bind(id)
            .bind(RequisitionStatus::HrApproved.id())
            .bind(RequisitionStatus::AssignedForAllocation.id())
            .bind(outcome.assigned_to)
            .bind(outcome.routing_reason)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(HrActionResult {
            requisition: routed,
            routed: Some(outcome),
        })
    }

    /// Withdraw (delete) a Pending requisition. Only the requester may do
    /// this; the gate is checked in core and re-applied in the DELETE.
    pub async fn withdraw(pool: &PgPool, id: DbId, actor: DbId) -> Result<(), RepoError> {
        let req = Self::find_by_id(pool, id).await?.ok_or(CoreError::NotFound {
            entity: "Requisition",
            id,
        })?;
        let status = Self::decode_status(req.status_id)?;
        requisition::can_withdraw(status, req.requested_by, actor)?;

        let result = sqlx::query(
            "DELETE FROM requisitions \
             WHERE id = $1 AND requested_by = $2 AND status_id = $3",
        )
        .bind(id)
        .bind(actor)
        .bind(RequisitionStatus::Pending.id())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::lost_race(RequisitionStatus::Pending).into());
        }
        Ok(())
    }

    /// Requisitions stuck in AssignedForAllocation with no asset manager:
    /// the admin's manual-routing worklist.
    pub async fn list_unrouted(pool: &PgPool) -> Result<Vec<Requisition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requisitions \
             WHERE status_id = $1 AND assigned_to IS NULL \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, Requisition>(&query)
            .bind(RequisitionStatus::AssignedForAllocation.id())
            .fetch_all(pool)
            .await
    }

    /// Manually route an unrouted requisition to an asset manager.
    /// Conflict if the requisition is not awaiting manual assignment.
    pub async fn manual_assign(
        pool: &PgPool,
        id: DbId,
        asset_manager_id: DbId,
    ) -> Result<Requisition, RepoError> {
        let query = format!(
            "UPDATE requisitions SET \
                assigned_to = $2, \
                routing_reason = $3 \
             WHERE id = $1 AND status_id = $4 AND assigned_to IS NULL \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Requisition>(&query)
            .bind(id)
            .bind(asset_manager_id)
            .bind(routing::REASON_MANUAL_ASSIGNMENT)
            .bind(RequisitionStatus::AssignedForAllocation.id())
            .fetch_optional(pool)
            .await?;

        updated.ok_or_else(|| {
            CoreError::Conflict(
                "Requisition is not awaiting manual asset manager assignment".into(),
            )
            .into()
        })
    }

    /// The allocation worklist for one asset manager: requisitions routed
    /// to them and awaiting an asset.
    pub async fn pending_allocations_for(
        pool: &PgPool,
        asset_manager_id: DbId,
    ) -> Result<Vec<Requisition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requisitions \
             WHERE status_id = $1 AND assigned_to = $2 \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, Requisition>(&query)
            .bind(RequisitionStatus::AssignedForAllocation.id())
            .bind(asset_manager_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Current status of a requisition, or NotFound.
    async fn status_of(pool: &PgPool, id: DbId) -> Result<RequisitionStatus, RepoError> {
        let row: Option<(i16,)> = sqlx::query_as("SELECT status_id FROM requisitions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        let (status_id,) = row.ok_or(CoreError::NotFound {
            entity: "Requisition",
            id,
        })?;
        Ok(Self::decode_status(status_id)?)
    }

    /// Same as [`Self::status_of`] but inside a transaction with a row lock.
    async fn status_of_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<RequisitionStatus, RepoError> {
        let row: Option<(i16,)> =
            sqlx::query_as("SELECT status_id FROM requisitions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        let (status_id,) = row.ok_or(CoreError::NotFound {
            entity: "Requisition",
            id,
        })?;
        Ok(Self::decode_status(status_id)?)
    }

    fn decode_status(status_id: i16) -> Result<RequisitionStatus, CoreError> {
        RequisitionStatus::from_id(status_id).ok_or_else(|| {
            CoreError::Internal(format!("Unknown requisition status id {status_id}"))
        })
    }

    /// The guarded update matched nothing: a concurrent actor moved the
    /// requisition between our read and our write.
    fn lost_race(expected: RequisitionStatus) -> CoreError {
        CoreError::Conflict(format!(
            "Requisition was modified concurrently (expected status {}); refresh and retry",
            expected.name()
        ))
    }
}
