//! Asset type catalog models and DTOs.

use inventra_core::status::StatusId;
use inventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `asset_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetType {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub depreciation_applicable: bool,
    pub asset_life_months: Option<i32>,
    pub to_be_recovered_on_separation: bool,
    /// Drives the routing resolver: requisitions for this type are routed
    /// here once HR-approved.
    pub assigned_asset_manager_id: Option<DbId>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an asset type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetType {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub depreciation_applicable: bool,
    pub asset_life_months: Option<i32>,
    #[serde(default)]
    pub to_be_recovered_on_separation: bool,
    pub assigned_asset_manager_id: Option<DbId>,
}

/// DTO for updating an asset type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub depreciation_applicable: Option<bool>,
    pub asset_life_months: Option<i32>,
    pub to_be_recovered_on_separation: Option<bool>,
    pub assigned_asset_manager_id: Option<DbId>,
    pub status_id: Option<StatusId>,
}
