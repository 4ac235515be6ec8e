//! Audit log models.

use inventra_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `audit_logs` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub actor_id: Option<DbId>,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub category: String,
    pub created_at: Timestamp,
}

/// A new audit entry. The category is derived from the action type at
/// insert time; details are redacted before they get here.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub actor_id: Option<DbId>,
    pub action_type: &'static str,
    pub entity_type: &'static str,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}

/// Filters for querying the audit trail.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub actor_id: Option<DbId>,
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub category: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of audit results with the unpaged total.
#[derive(Debug, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
}
