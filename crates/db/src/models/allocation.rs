//! Allocation models and DTOs.

use inventra_core::status::StatusId;
use inventra_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `allocations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Allocation {
    pub id: DbId,
    pub requisition_id: DbId,
    pub asset_definition_id: DbId,
    pub allocated_to: DbId,
    pub allocated_by: DbId,
    pub allocated_date: Date,
    pub status_id: StatusId,
    pub reference_id: Option<String>,
    pub document_id: Option<String>,
    pub dispatch_details: Option<String>,
    pub remarks: Option<String>,
    pub acknowledged: bool,
    pub acknowledgment_date: Option<Timestamp>,
    pub acknowledgment_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Allocation row enriched with asset details for "my assets" views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AllocationWithAsset {
    pub id: DbId,
    pub requisition_id: DbId,
    pub asset_definition_id: DbId,
    pub allocated_to: DbId,
    pub allocated_by: DbId,
    pub allocated_date: Date,
    pub status_id: StatusId,
    pub acknowledged: bool,
    pub acknowledgment_date: Option<Timestamp>,
    pub created_at: Timestamp,
    /// Resolved asset code (from JOIN).
    pub asset_code: String,
    /// Resolved asset name (from JOIN).
    pub asset_name: String,
    /// Resolved asset type name (from JOIN).
    pub asset_type_name: String,
    /// Resolved allocation status name (from JOIN).
    pub status_name: String,
}

/// Dispatch/paperwork metadata captured when an asset is handed over.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationMetadata {
    pub reference_id: Option<String>,
    pub document_id: Option<String>,
    pub dispatch_details: Option<String>,
    pub remarks: Option<String>,
}

/// DTO for acknowledging receipt of an allocated asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcknowledgeAllocation {
    pub notes: Option<String>,
}

/// Query parameters for listing allocations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationListParams {
    pub allocated_to: Option<DbId>,
    pub asset_definition_id: Option<DbId>,
    pub status_id: Option<StatusId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
