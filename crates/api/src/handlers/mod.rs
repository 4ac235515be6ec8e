//! HTTP handlers, one module per resource.

pub mod allocations;
pub mod asset_definitions;
pub mod asset_types;
pub mod audit;
pub mod auth;
pub mod company;
pub mod locations;
pub mod ndc;
pub mod requisitions;
pub mod retrievals;
pub mod separation_reasons;
pub mod users;

use inventra_core::types::DbId;
use inventra_db::models::audit::NewAuditLog;
use inventra_db::repositories::AuditLogRepo;

use crate::state::AppState;

/// Append an audit entry, best effort.
///
/// Audit writes never fail the business operation they describe; a failed
/// write is logged and swallowed.
pub(crate) async fn record_audit(
    state: &AppState,
    actor_id: DbId,
    action_type: &'static str,
    entity_type: &'static str,
    entity_id: DbId,
    details: serde_json::Value,
) {
    let entry = NewAuditLog {
        actor_id: Some(actor_id),
        action_type,
        entity_type,
        entity_id: Some(entity_id),
        details,
    };
    if let Err(error) = AuditLogRepo::insert(&state.pool, &entry).await {
        tracing::warn!(%error, action_type, entity_type, entity_id, "Failed to write audit entry");
    }
}
