//! Concurrency layer for contend
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: staged writes with the version each one observed
//! - Conflict detection at commit time (first-committer-wins)
//! - TransactionManager: commit serialization and transaction metrics
//!
//! Nothing here retries. A conflicting transaction is aborted and the
//! conflict is returned to the caller as a `WriteConflict` store error.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod transaction;
pub mod validation;

pub use manager::{TransactionManager, TransactionMetrics};
pub use transaction::{StagedWrite, TransactionContext, TransactionStatus};
pub use validation::{validate_write_set, ConflictType, ValidationResult};
