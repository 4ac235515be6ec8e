//! Asset instance (definition) models and DTOs.

use inventra_core::status::StatusId;
use inventra_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `asset_definitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetDefinition {
    pub id: DbId,
    pub asset_type_id: DbId,
    pub asset_code: String,
    pub name: String,
    pub asset_value: Decimal,
    pub current_depreciation_value: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub status_id: StatusId,
    pub assigned_asset_manager_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub allocated_to: Option<DbId>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Asset row enriched with resolved names for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetDefinitionWithNames {
    pub id: DbId,
    pub asset_type_id: DbId,
    pub asset_code: String,
    pub name: String,
    pub asset_value: Decimal,
    pub current_depreciation_value: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub status_id: StatusId,
    pub assigned_asset_manager_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub allocated_to: Option<DbId>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Resolved asset type name (from JOIN).
    pub type_name: String,
    /// Resolved asset type code (from JOIN).
    pub type_code: String,
    /// Resolved status name (from JOIN).
    pub status_name: String,
    /// Resolved location name, if any (from JOIN).
    pub location_name: Option<String>,
}

/// DTO for registering an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetDefinition {
    pub asset_type_id: DbId,
    pub asset_code: String,
    pub name: String,
    pub asset_value: Decimal,
    pub purchase_date: Option<Date>,
    pub assigned_asset_manager_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub remarks: Option<String>,
}

/// DTO for updating an asset. Allocation state is never written through
/// this path; it moves only via the allocation binder and retrieval
/// tracker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetDefinition {
    pub name: Option<String>,
    pub asset_value: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub status_id: Option<StatusId>,
    pub assigned_asset_manager_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub remarks: Option<String>,
}

/// Query parameters for listing/searching assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetSearchParams {
    /// Filter by asset code or name (ILIKE).
    pub search: Option<String>,
    pub asset_type_id: Option<DbId>,
    pub status_id: Option<StatusId>,
    pub location_id: Option<DbId>,
    pub allocated_to: Option<DbId>,
    /// Maximum results (default 50, max 200).
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
