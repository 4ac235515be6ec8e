//! No-Dues-Certificate lifecycle rules.
//!
//! An NDC request aggregates all of a separating employee's recoverable
//! allocations into retrieval obligations. Its status is derived from how
//! many of those retrievals have been resolved; HR may revoke at any
//! non-terminal point with a mandatory reason.

use crate::error::CoreError;
use crate::status::NdcStatus;

/// Derive the NDC status from its linked retrievals.
///
/// - no retrieval obligations at all → Completed (nothing to recover)
/// - none resolved yet → Pending
/// - some resolved → AssetManagerConfirmation
/// - all resolved → Completed
pub fn derive_status(total_retrievals: i64, resolved_retrievals: i64) -> NdcStatus {
    debug_assert!(resolved_retrievals <= total_retrievals);
    if resolved_retrievals >= total_retrievals {
        NdcStatus::Completed
    } else if resolved_retrievals > 0 {
        NdcStatus::AssetManagerConfirmation
    } else {
        NdcStatus::Pending
    }
}

/// Revocation gate: only non-terminal NDCs, always with a reason.
pub fn validate_revoke(status: NdcStatus, reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A non-empty reason is required to revoke an NDC request".into(),
        ));
    }
    if status.is_terminal() {
        return Err(CoreError::stale_status(
            "NDC request",
            "Pending or Asset Manager Confirmation",
            status.name(),
        ));
    }
    Ok(())
}
