//! Convenient imports for contend.
//!
//! ```
//! use contend::prelude::*;
//!
//! let harness = Harness::open_default()?;
//! let key = RecordKey::new("task1");
//! harness.seed(&key, "initial value")?;
//! # Ok::<(), contend::Error>(())
//! ```

// Main entry point
pub use crate::harness::{Harness, HarnessBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Probe
pub use contend_engine::{ConflictProbe, OutcomeClassifier, OutcomeReporter, ProbeOptions, ProbeRun};

// Core types
pub use contend_core::{
    DocumentStore, ErrorCode, Outcome, OutcomeClass, OutcomeSummary, Record, RecordKey,
    StoreError, TransactionOptions,
};
