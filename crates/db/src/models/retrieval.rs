//! Retrieval models and DTOs.

use inventra_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `retrievals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Retrieval {
    pub id: DbId,
    pub employee_id: DbId,
    pub asset_definition_id: DbId,
    /// Set when this retrieval was spawned by an NDC request.
    pub ndc_request_id: Option<DbId>,
    pub recovered: bool,
    pub asset_condition: Option<String>,
    pub returned_on: Option<Date>,
    pub recovery_value: Option<Decimal>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Retrieval row enriched with asset and employee names for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RetrievalWithNames {
    pub id: DbId,
    pub employee_id: DbId,
    pub asset_definition_id: DbId,
    pub ndc_request_id: Option<DbId>,
    pub recovered: bool,
    pub asset_condition: Option<String>,
    pub returned_on: Option<Date>,
    pub recovery_value: Option<Decimal>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    /// Resolved asset code (from JOIN).
    pub asset_code: String,
    /// Resolved asset name (from JOIN).
    pub asset_name: String,
    /// Resolved employee username (from JOIN).
    pub employee_username: String,
}

/// DTO for creating an ad-hoc retrieval.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRetrieval {
    pub employee_id: DbId,
    pub asset_definition_id: DbId,
    pub remarks: Option<String>,
}

/// DTO for completing (or annotating) a retrieval.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRetrieval {
    pub recovered: Option<bool>,
    pub asset_condition: Option<String>,
    pub returned_on: Option<Date>,
    pub recovery_value: Option<Decimal>,
    pub remarks: Option<String>,
}

/// Query parameters for listing retrievals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrievalListParams {
    pub employee_id: Option<DbId>,
    pub ndc_request_id: Option<DbId>,
    pub recovered: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
