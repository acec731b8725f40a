//! Probe engine for contend
//!
//! Drives concurrent optimistic-transaction writes against one record and
//! classifies what comes back:
//! - `ConflictProbe`: launches the attempts and joins them
//! - `OutcomeClassifier`: success / conflict / fatal from the error code
//! - `OutcomeReporter`: mutex-guarded tally of outcomes
//! - `MemoryStore`: in-memory reference store with OCC commits
//! - `HarnessConfig`: TOML configuration for store and probe

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod probe;
pub mod reporter;
pub mod store;

pub use classifier::{classify, OutcomeClassifier};
pub use config::{HarnessConfig, ProbeConfig, StoreConfig};
pub use error::{ConfigError, ReportError};
pub use probe::{ConflictProbe, ProbeOptions, ProbeRun};
pub use reporter::OutcomeReporter;
pub use store::{CollectionHandle, MemoryStore, MEMORY_SCHEME};
