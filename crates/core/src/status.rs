//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. Keeping these in core
//! lets the workflow transition functions stay free of database types.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID back into the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Requisition approval workflow status.
    ///
    /// The legal transition graph is enforced by
    /// [`crate::requisition::manager_transition`] and
    /// [`crate::requisition::hr_transition`]; the repository layer applies
    /// each transition as a conditional update so a stale status is a
    /// conflict, never a silent overwrite.
    RequisitionStatus {
        Pending = 1,
        ManagerApproved = 2,
        HrApproved = 3,
        AssignedForAllocation = 4,
        Allocated = 5,
        Rejected = 6,
        OnHold = 7,
    }
}

define_status_enum! {
    /// Physical asset instance status.
    AssetStatus {
        Available = 1,
        Allocated = 2,
        Damaged = 3,
        Lost = 4,
        UnderRepair = 5,
        OnHold = 6,
    }
}

define_status_enum! {
    /// Allocation record status, tracking the asset's custody with the
    /// employee from handover to return.
    AllocationStatus {
        AllocatedToEmployee = 1,
        ReceivedFromEmployee = 2,
        NotReceivedFromEmployee = 3,
        Damaged = 4,
        Lost = 5,
    }
}

define_status_enum! {
    /// No-Dues-Certificate request status.
    NdcStatus {
        Pending = 1,
        AssetManagerConfirmation = 2,
        Completed = 3,
        Revoked = 4,
    }
}

define_status_enum! {
    /// Asset type catalog status. Inactive types cannot take new
    /// requisitions or asset registrations.
    AssetTypeStatus {
        Active = 1,
        Inactive = 2,
    }
}

impl RequisitionStatus {
    /// Human-readable name matching the seeded lookup table rows.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::ManagerApproved => "Manager Approved",
            Self::HrApproved => "HR Approved",
            Self::AssignedForAllocation => "Assigned for Allocation",
            Self::Allocated => "Allocated",
            Self::Rejected => "Rejected",
            Self::OnHold => "On Hold",
        }
    }

    /// Terminal statuses accept no further workflow actions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Allocated | Self::Rejected)
    }
}

impl NdcStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::AssetManagerConfirmation => "Asset Manager Confirmation",
            Self::Completed => "Completed",
            Self::Revoked => "Revoked",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Revoked)
    }
}

impl AssetStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Allocated => "Allocated",
            Self::Damaged => "Damaged",
            Self::Lost => "Lost",
            Self::UnderRepair => "Under Repair",
            Self::OnHold => "On Hold",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ids_round_trip() {
        assert_eq!(RequisitionStatus::from_id(1), Some(RequisitionStatus::Pending));
        assert_eq!(
            RequisitionStatus::from_id(RequisitionStatus::OnHold.id()),
            Some(RequisitionStatus::OnHold)
        );
        assert_eq!(RequisitionStatus::from_id(99), None);
    }

    #[test]
    fn test_terminal_requisition_statuses() {
        assert!(RequisitionStatus::Allocated.is_terminal());
        assert!(RequisitionStatus::Rejected.is_terminal());
        assert!(!RequisitionStatus::Pending.is_terminal());
        assert!(!RequisitionStatus::OnHold.is_terminal());
    }

    #[test]
    fn test_terminal_ndc_statuses() {
        assert!(NdcStatus::Completed.is_terminal());
        assert!(NdcStatus::Revoked.is_terminal());
        assert!(!NdcStatus::Pending.is_terminal());
        assert!(!NdcStatus::AssetManagerConfirmation.is_terminal());
    }
}
