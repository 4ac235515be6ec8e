//! Roles and the capability table.
//!
//! Authorization is a static {role × action} lookup instead of role-name
//! string comparisons scattered through handlers. A user holds a *set* of
//! roles (there is no single-role column anywhere); an action is permitted
//! when any held role allows it.

use serde::{Deserialize, Serialize};

/// A well-known role. Must match the seed data in the `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Hr,
    AssetManager,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Hr => "hr",
            Self::AssetManager => "asset_manager",
            Self::Employee => "employee",
        }
    }

    /// Parse a role name as stored in the `roles` table or a JWT claim.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "hr" => Some(Self::Hr),
            "asset_manager" => Some(Self::AssetManager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Hr,
        Role::AssetManager,
        Role::Employee,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every gated operation in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageUsers,
    ManageLocations,
    ManageCompanyProfile,
    ManageSeparationReasons,
    ManageAssetTypes,
    ManageAssetDefinitions,
    BulkImportAssets,
    ExportData,
    CreateRequisition,
    ManagerAction,
    HrAction,
    ManualRoutingAssignment,
    AllocateAsset,
    AcknowledgeAllocation,
    RecordRetrieval,
    ManageNdc,
    RevokeNdc,
    ViewAuditLogs,
}

/// The capability table: does `role` permit `action`?
///
/// Admin is deliberately not a superset of the workflow roles: approval
/// actions belong to managers and HR, and physical allocation/retrieval to
/// asset managers, so the audit trail always reflects the responsible
/// function. Admin owns catalogs, users, routing repair, and exports.
pub fn is_allowed(role: Role, action: Action) -> bool {
    use Action::*;
    match role {
        Role::Admin => matches!(
            action,
            ManageUsers
                | ManageLocations
                | ManageCompanyProfile
                | ManageSeparationReasons
                | ManageAssetTypes
                | ManageAssetDefinitions
                | BulkImportAssets
                | ExportData
                | ManualRoutingAssignment
                | ViewAuditLogs
        ),
        Role::Manager => matches!(action, ManagerAction | CreateRequisition | AcknowledgeAllocation),
        Role::Hr => matches!(
            action,
            HrAction | ManageNdc | RevokeNdc | CreateRequisition | AcknowledgeAllocation
        ),
        Role::AssetManager => matches!(
            action,
            AllocateAsset
                | RecordRetrieval
                | ManageAssetDefinitions
                | BulkImportAssets
                | ExportData
                | CreateRequisition
                | AcknowledgeAllocation
        ),
        Role::Employee => matches!(action, CreateRequisition | AcknowledgeAllocation),
    }
}

/// Whether any of the held roles permits the action.
///
/// Unknown role strings (stale tokens, removed roles) are skipped, never
/// treated as a grant.
pub fn any_allowed<'a, I>(roles: I, action: Action) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    roles
        .into_iter()
        .filter_map(Role::parse)
        .any(|role| is_allowed(role, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_admin_does_not_hold_workflow_approvals() {
        assert!(!is_allowed(Role::Admin, Action::ManagerAction));
        assert!(!is_allowed(Role::Admin, Action::HrAction));
        assert!(!is_allowed(Role::Admin, Action::AllocateAsset));
    }

    #[test]
    fn test_manager_and_hr_gates() {
        assert!(is_allowed(Role::Manager, Action::ManagerAction));
        assert!(!is_allowed(Role::Manager, Action::HrAction));
        assert!(is_allowed(Role::Hr, Action::HrAction));
        assert!(!is_allowed(Role::Hr, Action::ManagerAction));
    }

    #[test]
    fn test_asset_manager_gates() {
        assert!(is_allowed(Role::AssetManager, Action::AllocateAsset));
        assert!(is_allowed(Role::AssetManager, Action::RecordRetrieval));
        assert!(!is_allowed(Role::AssetManager, Action::ManageNdc));
        assert!(!is_allowed(Role::Employee, Action::AllocateAsset));
    }

    #[test]
    fn test_everyone_can_requisition_and_acknowledge() {
        for role in Role::ALL {
            if role == Role::Admin {
                continue;
            }
            assert!(is_allowed(role, Action::CreateRequisition), "{role}");
            assert!(is_allowed(role, Action::AcknowledgeAllocation), "{role}");
        }
    }

    #[test]
    fn test_any_allowed_over_role_set() {
        let roles = ["employee", "asset_manager"];
        assert!(any_allowed(roles, Action::AllocateAsset));
        assert!(!any_allowed(roles, Action::HrAction));

        // Unknown roles never grant anything.
        assert!(!any_allowed(["root", "owner"], Action::ManageUsers));
        assert!(!any_allowed([], Action::CreateRequisition));
    }
}
