//! Core types for the contend conflict probe
//!
//! This crate defines the vocabulary shared by every other crate:
//! - Record and attempt model (`Record`, `RecordKey`, `Attempt`)
//! - Outcome taxonomy (`Outcome`, `OutcomeClass`, `OutcomeSummary`)
//! - Structured store errors keyed by numeric condition code
//! - The `DocumentStore` adapter trait implemented by backing stores

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod outcome;
pub mod traits;
pub mod types;

pub use error::{ErrorCode, StoreError, StoreResult, TRANSIENT_TRANSACTION_ERROR};
pub use outcome::{Outcome, OutcomeClass, OutcomeSummary};
pub use traits::{DocumentStore, TransactionOptions};
pub use types::{candidate_value, Attempt, AttemptIndex, Record, RecordKey, DEFAULT_VALUE_PREFIX};
