//! Requisition approval state machine and create-time validation.
//!
//! The legal status graph:
//!
//! ```text
//! Pending --(manager approve)--> ManagerApproved
//!         --(manager reject)---> Rejected
//!         --(manager hold)-----> OnHold
//!         --(requester withdraw)--> {deleted}
//!
//! ManagerApproved --(HR approve)--> HrApproved
//!                 --(HR reject)---> Rejected
//!                 --(HR hold)-----> OnHold
//!
//! OnHold --(HR approve)--> HrApproved
//!        --(HR reject)---> Rejected
//!
//! HrApproved --(routing, automatic)--> AssignedForAllocation
//! AssignedForAllocation --(allocation)--> Allocated
//! ```
//!
//! Only HR may act on an OnHold requisition; a manager action there is a
//! conflict. Every action requires a non-empty reason. These functions are
//! pure -- the repository layer re-checks the same precondition atomically
//! with a conditional update so two concurrent actions cannot both succeed.

use crate::error::CoreError;
use crate::status::RequisitionStatus;
use crate::types::DbId;

/// An approval-stage action submitted by a manager or HR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Reject,
    Hold,
}

impl ApprovalAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Hold => "hold",
        }
    }

    /// Parse the wire form used by the action endpoints.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "hold" => Ok(Self::Hold),
            other => Err(CoreError::Validation(format!(
                "Invalid action '{other}'. Must be one of: approve, reject, hold"
            ))),
        }
    }
}

/// What a requisition is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    NewAllocation,
    Replacement,
    Return,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewAllocation => "new_allocation",
            Self::Replacement => "replacement",
            Self::Return => "return",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "new_allocation" => Ok(Self::NewAllocation),
            "replacement" => Ok(Self::Replacement),
            "return" => Ok(Self::Return),
            other => Err(CoreError::Validation(format!(
                "Invalid request_type '{other}'. Must be one of: new_allocation, replacement, return"
            ))),
        }
    }

    /// Replacement and Return requests must describe the asset being
    /// handed back and why.
    pub fn requires_return_details(self) -> bool {
        matches!(self, Self::Replacement | Self::Return)
    }
}

/// Who the requested asset is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFor {
    Myself,
    TeamMember,
}

impl RequestFor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Myself => "self",
            Self::TeamMember => "team_member",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "self" => Ok(Self::Myself),
            "team_member" => Ok(Self::TeamMember),
            other => Err(CoreError::Validation(format!(
                "Invalid request_for '{other}'. Must be one of: self, team_member"
            ))),
        }
    }
}

/// Reject blank or whitespace-only action reasons before any state is read.
pub fn validate_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A non-empty reason is required for approve, reject, and hold actions".into(),
        ));
    }
    Ok(())
}

/// Manager-stage transition. Managers act only on Pending requisitions.
pub fn manager_transition(
    current: RequisitionStatus,
    action: ApprovalAction,
) -> Result<RequisitionStatus, CoreError> {
    match current {
        RequisitionStatus::Pending => Ok(match action {
            ApprovalAction::Approve => RequisitionStatus::ManagerApproved,
            ApprovalAction::Reject => RequisitionStatus::Rejected,
            ApprovalAction::Hold => RequisitionStatus::OnHold,
        }),
        other => Err(CoreError::stale_status(
            "Requisition",
            RequisitionStatus::Pending.name(),
            other.name(),
        )),
    }
}

/// HR-stage transition. HR acts on ManagerApproved requisitions and may
/// also resolve OnHold ones (approve or reject; a second hold is a
/// conflict).
pub fn hr_transition(
    current: RequisitionStatus,
    action: ApprovalAction,
) -> Result<RequisitionStatus, CoreError> {
    match (current, action) {
        (RequisitionStatus::ManagerApproved, ApprovalAction::Approve) => {
            Ok(RequisitionStatus::HrApproved)
        }
        (RequisitionStatus::ManagerApproved, ApprovalAction::Reject) => {
            Ok(RequisitionStatus::Rejected)
        }
        (RequisitionStatus::ManagerApproved, ApprovalAction::Hold) => Ok(RequisitionStatus::OnHold),
        (RequisitionStatus::OnHold, ApprovalAction::Approve) => Ok(RequisitionStatus::HrApproved),
        (RequisitionStatus::OnHold, ApprovalAction::Reject) => Ok(RequisitionStatus::Rejected),
        (RequisitionStatus::OnHold, ApprovalAction::Hold) => Err(CoreError::Conflict(
            "Requisition is already on hold".into(),
        )),
        (other, _) => Err(CoreError::stale_status(
            "Requisition",
            "Manager Approved or On Hold",
            other.name(),
        )),
    }
}

/// Withdrawal gate: only the original requester, only while Pending.
pub fn can_withdraw(
    status: RequisitionStatus,
    requested_by: DbId,
    actor: DbId,
) -> Result<(), CoreError> {
    if requested_by != actor {
        return Err(CoreError::Forbidden(
            "Only the requester may withdraw a requisition".into(),
        ));
    }
    if status != RequisitionStatus::Pending {
        return Err(CoreError::stale_status(
            "Requisition",
            RequisitionStatus::Pending.name(),
            status.name(),
        ));
    }
    Ok(())
}

/// Create-time payload, after the wire enums have been parsed.
#[derive(Debug)]
pub struct NewRequisition<'a> {
    pub request_type: RequestType,
    pub request_for: RequestFor,
    pub team_member_id: Option<DbId>,
    pub justification: &'a str,
    pub reason_for_return_replacement: Option<&'a str>,
    pub asset_details: Option<&'a str>,
}

/// Field-level validation for a new requisition.
///
/// Replacement/Return requests must carry both a return/replacement reason
/// and a description of the asset being returned; team-member requests must
/// name the team member.
pub fn validate_new_requisition(req: &NewRequisition<'_>) -> Result<(), CoreError> {
    if req.justification.trim().is_empty() {
        return Err(CoreError::Validation("justification must not be empty".into()));
    }

    if req.request_type.requires_return_details() {
        let reason_ok = req
            .reason_for_return_replacement
            .is_some_and(|r| !r.trim().is_empty());
        if !reason_ok {
            return Err(CoreError::Validation(format!(
                "reason_for_return_replacement is required for {} requests",
                req.request_type.as_str()
            )));
        }
        let details_ok = req.asset_details.is_some_and(|d| !d.trim().is_empty());
        if !details_ok {
            return Err(CoreError::Validation(format!(
                "asset_details is required for {} requests",
                req.request_type.as_str()
            )));
        }
    }

    if req.request_for == RequestFor::TeamMember && req.team_member_id.is_none() {
        return Err(CoreError::Validation(
            "team_member_id is required when request_for is team_member".into(),
        ));
    }

    Ok(())
}
