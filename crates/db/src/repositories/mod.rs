//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Plain CRUD methods return
//! `sqlx::Error`; workflow methods that enforce state-machine preconditions
//! return [`RepoError`] so a stale status surfaces as a domain conflict
//! rather than a database error.

use inventra_core::error::CoreError;

pub mod allocation_repo;
pub mod asset_definition_repo;
pub mod asset_type_repo;
pub mod audit_repo;
pub mod company_repo;
pub mod location_repo;
pub mod ndc_repo;
pub mod requisition_repo;
pub mod retrieval_repo;
pub mod role_repo;
pub mod separation_reason_repo;
pub mod session_repo;
pub mod user_repo;

pub use allocation_repo::AllocationRepo;
pub use asset_definition_repo::AssetDefinitionRepo;
pub use asset_type_repo::AssetTypeRepo;
pub use audit_repo::AuditLogRepo;
pub use company_repo::CompanyProfileRepo;
pub use location_repo::LocationRepo;
pub use ndc_repo::NdcRepo;
pub use requisition_repo::RequisitionRepo;
pub use retrieval_repo::RetrievalRepo;
pub use role_repo::RoleRepo;
pub use separation_reason_repo::SeparationReasonRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;

/// Error type for workflow repository methods.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Domain-level failure (stale status, validation, missing entity).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying database failure.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Clamp a requested page size to `[1, max]`, defaulting when absent.
pub(crate) fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a requested offset to be non-negative.
pub(crate) fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
