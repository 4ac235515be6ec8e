//! Requisition models and DTOs.

use inventra_core::status::StatusId;
use inventra_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `requisitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Requisition {
    pub id: DbId,
    pub asset_type_id: DbId,
    pub request_type: String,
    pub requested_by: DbId,
    pub request_for: String,
    pub team_member_id: Option<DbId>,
    pub justification: String,
    pub reason_for_return_replacement: Option<String>,
    pub asset_details: Option<String>,
    pub required_by_date: Option<Date>,
    pub status_id: StatusId,
    pub assigned_to: Option<DbId>,
    pub routing_reason: Option<String>,
    pub manager_actioned_by: Option<DbId>,
    pub manager_action_reason: Option<String>,
    pub manager_actioned_at: Option<Timestamp>,
    pub hr_actioned_by: Option<DbId>,
    pub hr_action_reason: Option<String>,
    pub hr_actioned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Requisition row enriched with resolved names for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequisitionWithNames {
    pub id: DbId,
    pub asset_type_id: DbId,
    pub request_type: String,
    pub requested_by: DbId,
    pub request_for: String,
    pub team_member_id: Option<DbId>,
    pub justification: String,
    pub reason_for_return_replacement: Option<String>,
    pub asset_details: Option<String>,
    pub required_by_date: Option<Date>,
    pub status_id: StatusId,
    pub assigned_to: Option<DbId>,
    pub routing_reason: Option<String>,
    pub created_at: Timestamp,
    /// Resolved asset type name (from JOIN).
    pub asset_type_name: String,
    /// Resolved status name (from JOIN).
    pub status_name: String,
    /// Resolved requester username (from JOIN).
    pub requested_by_username: String,
}

/// DTO for creating a requisition. Validated by
/// `inventra_core::requisition::validate_new_requisition` before insert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequisition {
    pub asset_type_id: DbId,
    pub request_type: String,
    pub request_for: String,
    pub team_member_id: Option<DbId>,
    pub justification: String,
    pub reason_for_return_replacement: Option<String>,
    pub asset_details: Option<String>,
    pub required_by_date: Option<Date>,
}

/// Query parameters for listing requisitions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequisitionListParams {
    pub status_id: Option<StatusId>,
    pub asset_type_id: Option<DbId>,
    pub requested_by: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
