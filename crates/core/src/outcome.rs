//! Attempt outcomes and the aggregate summary

use crate::types::AttemptIndex;
use serde::{Deserialize, Serialize};

/// Outcome class of a finished attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    /// Transaction committed
    Success,
    /// Rejected by optimistic concurrency control; retryable by the caller
    Conflict,
    /// Any other failure
    Fatal,
}

impl std::fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutcomeClass::Success => "success",
            OutcomeClass::Conflict => "conflict",
            OutcomeClass::Fatal => "fatal",
        };
        write!(f, "{}", name)
    }
}

/// Terminal outcome of an attempt, with the underlying error description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// Transaction committed
    Success,
    /// Write conflict
    Conflict(String),
    /// Unexpected failure
    Fatal(String),
}

impl Outcome {
    /// Outcome class
    pub fn class(&self) -> OutcomeClass {
        match self {
            Outcome::Success => OutcomeClass::Success,
            Outcome::Conflict(_) => OutcomeClass::Conflict,
            Outcome::Fatal(_) => OutcomeClass::Fatal,
        }
    }

    /// Error description, if the attempt failed
    pub fn detail(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::Conflict(detail) | Outcome::Fatal(detail) => Some(detail),
        }
    }
}

/// Aggregate counts of attempt outcomes
///
/// The per-class counts always sum to the number of recorded attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// Committed attempts
    pub success_count: u64,
    /// Attempts rejected with a write conflict
    pub conflict_count: u64,
    /// Attempts that failed for any other reason
    pub fatal_count: u64,
    /// Indices of conflicted attempts, ascending
    pub conflicted_indices: Vec<AttemptIndex>,
}

impl OutcomeSummary {
    /// Total number of recorded attempts
    pub fn total(&self) -> u64 {
        self.success_count + self.conflict_count + self.fatal_count
    }

    /// Count for one class
    pub fn count(&self, class: OutcomeClass) -> u64 {
        match class {
            OutcomeClass::Success => self.success_count,
            OutcomeClass::Conflict => self.conflict_count,
            OutcomeClass::Fatal => self.fatal_count,
        }
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
