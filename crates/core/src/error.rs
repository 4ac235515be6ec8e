use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Conflict error for a state transition attempted from the wrong
    /// current status. Used by every workflow guard so the message shape is
    /// consistent across requisitions, allocations, retrievals, and NDCs.
    pub fn stale_status(entity: &'static str, expected: &str, actual: &str) -> Self {
        CoreError::Conflict(format!(
            "{entity} is not in the expected state: expected {expected}, found {actual}"
        ))
    }
}
