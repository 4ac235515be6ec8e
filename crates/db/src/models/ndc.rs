//! No-Dues-Certificate request models and DTOs.

use inventra_core::status::StatusId;
use inventra_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ndc_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NdcRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub resigned_on: Date,
    pub notice_period_days: i32,
    pub last_working_date: Date,
    pub separation_approved_by: Option<DbId>,
    pub separation_reason_id: Option<DbId>,
    pub status_id: StatusId,
    pub revoked_by: Option<DbId>,
    pub revoke_reason: Option<String>,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening an NDC request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNdcRequest {
    pub employee_id: DbId,
    pub resigned_on: Date,
    #[serde(default)]
    pub notice_period_days: i32,
    pub last_working_date: Date,
    pub separation_approved_by: Option<DbId>,
    pub separation_reason_id: Option<DbId>,
}

/// Query parameters for listing NDC requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NdcListParams {
    pub employee_id: Option<DbId>,
    pub status_id: Option<StatusId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
