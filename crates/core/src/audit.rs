//! Audit trail constants and helpers.
//!
//! Lives in core so the repository layer and the API layer agree on action
//! names without depending on each other.

/// Known action types for audit log entries.
pub mod action_types {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const REQUISITION_CREATE: &str = "requisition_create";
    pub const REQUISITION_WITHDRAW: &str = "requisition_withdraw";
    pub const MANAGER_APPROVE: &str = "manager_approve";
    pub const MANAGER_REJECT: &str = "manager_reject";
    pub const MANAGER_HOLD: &str = "manager_hold";
    pub const HR_APPROVE: &str = "hr_approve";
    pub const HR_REJECT: &str = "hr_reject";
    pub const HR_HOLD: &str = "hr_hold";
    pub const ROUTE: &str = "route";
    pub const MANUAL_ASSIGN: &str = "manual_assign";
    pub const ALLOCATE: &str = "allocate";
    pub const ACKNOWLEDGE: &str = "acknowledge";
    pub const RETRIEVAL_CREATE: &str = "retrieval_create";
    pub const RETRIEVAL_COMPLETE: &str = "retrieval_complete";
    pub const NDC_CREATE: &str = "ndc_create";
    pub const NDC_COMPLETE: &str = "ndc_complete";
    pub const NDC_REVOKE: &str = "ndc_revoke";
    pub const ENTITY_CREATE: &str = "entity_create";
    pub const ENTITY_UPDATE: &str = "entity_update";
    pub const ENTITY_DELETE: &str = "entity_delete";
    pub const BULK_IMPORT: &str = "bulk_import";
}

/// Known log categories for filtering and retention grouping.
pub mod log_categories {
    pub const AUTHENTICATION: &str = "authentication";
    pub const WORKFLOW: &str = "workflow";
    pub const ADMINISTRATION: &str = "administration";
}

/// Map an action type to its log category. Unknown actions default to
/// `workflow`.
pub fn action_to_category(action_type: &str) -> &'static str {
    use action_types::*;
    match action_type {
        LOGIN | LOGOUT => log_categories::AUTHENTICATION,
        ENTITY_CREATE | ENTITY_UPDATE | ENTITY_DELETE | BULK_IMPORT => {
            log_categories::ADMINISTRATION
        }
        _ => log_categories::WORKFLOW,
    }
}

/// Fields redacted from audit log details before storage.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "new_password",
    "password_hash",
    "token",
    "access_token",
    "refresh_token",
    "secret",
    "authorization",
];

/// Redact sensitive fields from a JSON value (shallow, top-level keys only).
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let redacted = map
                .iter()
                .map(|(k, v)| {
                    if SENSITIVE_FIELDS.contains(&k.to_lowercase().as_str()) {
                        (k.clone(), serde_json::Value::String("[REDACTED]".into()))
                    } else {
                        (k.clone(), v.clone())
                    }
                })
                .collect();
            serde_json::Value::Object(redacted)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_categories() {
        assert_eq!(
            action_to_category(action_types::LOGIN),
            log_categories::AUTHENTICATION
        );
        assert_eq!(
            action_to_category(action_types::HR_APPROVE),
            log_categories::WORKFLOW
        );
        assert_eq!(
            action_to_category(action_types::ENTITY_DELETE),
            log_categories::ADMINISTRATION
        );
        assert_eq!(action_to_category("unknown"), log_categories::WORKFLOW);
    }

    #[test]
    fn test_redaction_replaces_sensitive_keys() {
        let details = json!({
            "username": "avery",
            "password": "hunter2",
            "Refresh_Token": "abc",
        });
        let redacted = redact_sensitive_fields(&details);
        assert_eq!(redacted["username"], "avery");
        assert_eq!(redacted["password"], "[REDACTED]");
        assert_eq!(redacted["Refresh_Token"], "[REDACTED]");
    }

    #[test]
    fn test_redaction_passes_non_objects_through() {
        let value = json!("plain string");
        assert_eq!(redact_sensitive_fields(&value), value);
    }
}
