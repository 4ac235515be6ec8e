//! Retrieval lifecycle rules: completion validation and the asset /
//! allocation status sync applied when an asset comes back.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::status::{AllocationStatus, AssetStatus};

/// Asset came back in working order.
pub const CONDITION_GOOD: &str = "good_condition";

/// Asset came back damaged; a recovery value must be recorded.
pub const CONDITION_DAMAGED: &str = "damaged";

/// All valid asset conditions on a completed retrieval.
pub const VALID_CONDITIONS: &[&str] = &[CONDITION_GOOD, CONDITION_DAMAGED];

/// Validate the fields of a retrieval completion (`recovered` → true).
///
/// The condition is mandatory; `recovery_value` is required when the asset
/// came back damaged and must be absent otherwise.
pub fn validate_completion(
    asset_condition: Option<&str>,
    recovery_value: Option<Decimal>,
) -> Result<(), CoreError> {
    let condition = asset_condition.ok_or_else(|| {
        CoreError::Validation(
            "asset_condition is required when marking a retrieval as recovered".into(),
        )
    })?;

    if !VALID_CONDITIONS.contains(&condition) {
        return Err(CoreError::Validation(format!(
            "Invalid asset_condition '{condition}'. Must be one of: {}",
            VALID_CONDITIONS.join(", ")
        )));
    }

    match (condition, recovery_value) {
        (CONDITION_DAMAGED, None) => Err(CoreError::Validation(
            "recovery_value is required when asset_condition is damaged".into(),
        )),
        (CONDITION_DAMAGED, Some(value)) if value < Decimal::ZERO => Err(CoreError::Validation(
            "recovery_value must not be negative".into(),
        )),
        (CONDITION_GOOD, Some(_)) => Err(CoreError::Validation(
            "recovery_value is only recorded for damaged assets".into(),
        )),
        _ => Ok(()),
    }
}

/// Asset status once a completed retrieval releases it from the employee.
///
/// A recovered asset always leaves `Allocated`: back to the pool when it
/// returned in good condition, to `Damaged` otherwise. `Lost` is never set
/// here -- a completed retrieval means the asset physically came back.
pub fn asset_status_after_return(asset_condition: &str) -> AssetStatus {
    match asset_condition {
        CONDITION_DAMAGED => AssetStatus::Damaged,
        _ => AssetStatus::Available,
    }
}

/// Allocation record status once the asset is returned.
pub fn allocation_status_after_return(asset_condition: &str) -> AllocationStatus {
    match asset_condition {
        CONDITION_DAMAGED => AllocationStatus::Damaged,
        _ => AllocationStatus::ReceivedFromEmployee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_condition_is_mandatory() {
        assert_matches!(
            validate_completion(None, None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_unknown_condition_rejected() {
        assert_matches!(
            validate_completion(Some("pristine"), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_good_condition_needs_no_recovery_value() {
        assert!(validate_completion(Some(CONDITION_GOOD), None).is_ok());
        assert_matches!(
            validate_completion(Some(CONDITION_GOOD), Some(Decimal::new(10000, 2))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_damaged_requires_recovery_value() {
        assert_matches!(
            validate_completion(Some(CONDITION_DAMAGED), None),
            Err(CoreError::Validation(_))
        );
        assert!(validate_completion(Some(CONDITION_DAMAGED), Some(Decimal::new(25050, 2))).is_ok());
        assert_matches!(
            validate_completion(Some(CONDITION_DAMAGED), Some(Decimal::NEGATIVE_ONE)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_asset_leaves_allocated_on_return() {
        assert_eq!(asset_status_after_return(CONDITION_GOOD), AssetStatus::Available);
        assert_eq!(asset_status_after_return(CONDITION_DAMAGED), AssetStatus::Damaged);
    }

    #[test]
    fn test_allocation_status_after_return() {
        assert_eq!(
            allocation_status_after_return(CONDITION_GOOD),
            AllocationStatus::ReceivedFromEmployee
        );
        assert_eq!(
            allocation_status_after_return(CONDITION_DAMAGED),
            AllocationStatus::Damaged
        );
    }
}
