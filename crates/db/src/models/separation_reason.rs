use inventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `separation_reasons` lookup table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeparationReason {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a separation reason.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeparationReason {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a separation reason.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSeparationReason {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
