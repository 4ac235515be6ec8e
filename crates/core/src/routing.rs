//! Routing resolver: which asset manager owns an approved requisition.
//!
//! Runs automatically when a requisition passes HR approval. The decision is
//! driven entirely by the asset type's assigned manager; an unassigned type
//! does not block progression but flags the requisition for manual routing
//! by an administrator.

use crate::types::DbId;

/// Routing reason recorded when the asset type carries an assigned manager.
pub const REASON_BY_ASSET_TYPE: &str = "Routed by asset type assignment";

/// Routing reason recorded when no manager is assigned to the asset type.
pub const REASON_MANUAL_REQUIRED: &str =
    "No asset manager assigned to asset type; manual assignment required";

/// Routing reason recorded when an administrator assigns manually.
pub const REASON_MANUAL_ASSIGNMENT: &str = "Manually assigned by administrator";

/// The outcome of routing a requisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingOutcome {
    /// The asset manager the requisition is routed to, if any.
    pub assigned_to: Option<DbId>,
    /// Human-readable explanation stored on the requisition.
    pub routing_reason: &'static str,
    /// Whether an administrator must assign a manager by hand.
    pub needs_manual_assignment: bool,
}

/// Resolve routing from the asset type's assigned manager.
pub fn resolve(assigned_asset_manager_id: Option<DbId>) -> RoutingOutcome {
    match assigned_asset_manager_id {
        Some(manager_id) => RoutingOutcome {
            assigned_to: Some(manager_id),
            routing_reason: REASON_BY_ASSET_TYPE,
            needs_manual_assignment: false,
        },
        None => RoutingOutcome {
            assigned_to: None,
            routing_reason: REASON_MANUAL_REQUIRED,
            needs_manual_assignment: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_to_asset_type_manager() {
        let outcome = resolve(Some(31));
        assert_eq!(outcome.assigned_to, Some(31));
        assert_eq!(outcome.routing_reason, REASON_BY_ASSET_TYPE);
        assert!(!outcome.needs_manual_assignment);
    }

    #[test]
    fn test_unassigned_type_flags_manual_assignment() {
        let outcome = resolve(None);
        assert_eq!(outcome.assigned_to, None);
        assert_eq!(outcome.routing_reason, REASON_MANUAL_REQUIRED);
        assert!(outcome.needs_manual_assignment);
    }
}
