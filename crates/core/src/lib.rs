//! Pure domain logic for the Inventra asset management platform.
//!
//! This crate has no database, async, or I/O dependencies. It holds the
//! requisition approval state machine, routing and allocation rules,
//! retrieval/NDC lifecycle logic, role capabilities, CSV import/export
//! helpers, and shared types -- everything the db and api crates agree on.

pub mod allocation;
pub mod audit;
pub mod csv;
pub mod depreciation;
pub mod error;
pub mod importer;
pub mod ndc;
pub mod requisition;
pub mod retrieval;
pub mod roles;
pub mod routing;
pub mod status;
pub mod types;
