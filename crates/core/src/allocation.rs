//! Allocation binding rules: recipient resolution, type compatibility,
//! and the acknowledgment sub-flow gate.

use crate::error::CoreError;
use crate::requisition::RequestFor;
use crate::types::DbId;

/// Who receives the asset for a given requisition.
///
/// Team-member requests are fulfilled to the named team member; everything
/// else goes to the requester.
pub fn recipient_for(
    request_for: RequestFor,
    requested_by: DbId,
    team_member_id: Option<DbId>,
) -> Result<DbId, CoreError> {
    match request_for {
        RequestFor::Myself => Ok(requested_by),
        RequestFor::TeamMember => team_member_id.ok_or_else(|| {
            CoreError::Internal(
                "team_member requisition persisted without a team_member_id".into(),
            )
        }),
    }
}

/// Asset-type compatibility is a hard constraint: an allocation may only
/// bind an asset of the requisition's requested type.
pub fn check_type_compatibility(
    requisition_type_id: DbId,
    asset_type_id: DbId,
) -> Result<(), CoreError> {
    if requisition_type_id != asset_type_id {
        return Err(CoreError::Validation(format!(
            "Asset type mismatch: requisition expects asset type {requisition_type_id}, \
             asset is of type {asset_type_id}"
        )));
    }
    Ok(())
}

/// Acknowledgment gate: only the allocation recipient may acknowledge, and
/// only once.
pub fn can_acknowledge(
    allocated_to: DbId,
    actor: DbId,
    already_acknowledged: bool,
) -> Result<(), CoreError> {
    if allocated_to != actor {
        return Err(CoreError::Forbidden(
            "Only the allocation recipient may acknowledge receipt".into(),
        ));
    }
    if already_acknowledged {
        return Err(CoreError::Conflict(
            "Allocation has already been acknowledged".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_recipient_is_requester_for_self_requests() {
        assert_eq!(recipient_for(RequestFor::Myself, 5, None).unwrap(), 5);
        // A stray team_member_id on a self request is ignored.
        assert_eq!(recipient_for(RequestFor::Myself, 5, Some(9)).unwrap(), 5);
    }

    #[test]
    fn test_recipient_is_team_member_when_named() {
        assert_eq!(
            recipient_for(RequestFor::TeamMember, 5, Some(9)).unwrap(),
            9
        );
        assert_matches!(
            recipient_for(RequestFor::TeamMember, 5, None),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn test_type_mismatch_is_validation_error() {
        assert!(check_type_compatibility(1, 1).is_ok());
        assert_matches!(
            check_type_compatibility(1, 2),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_acknowledge_gates() {
        assert!(can_acknowledge(4, 4, false).is_ok());
        assert_matches!(can_acknowledge(4, 5, false), Err(CoreError::Forbidden(_)));
        assert_matches!(can_acknowledge(4, 4, true), Err(CoreError::Conflict(_)));
    }
}
