//! # contend
//!
//! Concurrent write-conflict probe for optimistic-transaction document
//! stores.
//!
//! A run seeds one record, launches N attempts that each replace the
//! record's value inside their own transaction, and classifies every
//! attempt as success, conflict (the store's write-conflict code) or fatal
//! (anything else).
//!
//! ## Quick Start
//!
//! ```
//! use contend::prelude::*;
//!
//! let harness = Harness::open_default()?;
//! let key = RecordKey::new("task1");
//!
//! harness.seed(&key, "initial value")?;
//! let run = harness.run_detailed(&key, 50);
//!
//! assert_eq!(run.summary.total(), 50);
//! let record = harness.read(&key)?.expect("seeded");
//! assert!(run.is_candidate(&record.value));
//! # Ok::<(), contend::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `contend-core` - records, outcomes, `StoreError`, `DocumentStore`
//! - `contend-storage` - namespaced versioned document storage
//! - `contend-concurrency` - optimistic transactions, first committer wins
//! - `contend-engine` - probe, classifier, reporter, in-memory store, config

#![warn(missing_docs)]

mod error;
mod harness;

pub mod prelude;

pub use error::{Error, Result};
pub use harness::{Harness, HarnessBuilder};

pub use contend_core::{
    candidate_value, Attempt, AttemptIndex, DocumentStore, ErrorCode, Outcome, OutcomeClass,
    OutcomeSummary, Record, RecordKey, StoreError, StoreResult, TransactionOptions,
    DEFAULT_VALUE_PREFIX, TRANSIENT_TRANSACTION_ERROR,
};
pub use contend_engine::{
    classify, CollectionHandle, ConfigError, ConflictProbe, HarnessConfig, MemoryStore,
    OutcomeClassifier, OutcomeReporter, ProbeConfig, ProbeOptions, ProbeRun, ReportError,
    StoreConfig,
};
