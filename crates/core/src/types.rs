//! Core types for the conflict probe
//!
//! This module defines the data model the probe operates on:
//! - [`RecordKey`]: Unique, immutable key of the contended record
//! - [`Record`]: The record as it appears on the wire
//! - [`Attempt`]: One concurrent replace attempt and its terminal outcome

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Default prefix of the candidate value written by an attempt
pub const DEFAULT_VALUE_PREFIX: &str = "value:";

/// Index of an attempt within a probe run (1-based)
pub type AttemptIndex = u32;

/// Unique key of a record
///
/// The key is fixed when the record is seeded and never changes afterwards.
/// It serializes as a bare string so the record keeps the `{ "id": .. }`
/// wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    /// Create a key from any string-like value
    ///
    /// # Examples
    ///
    /// ```
    /// use contend_core::RecordKey;
    ///
    /// let key = RecordKey::new("task1");
    /// assert_eq!(key.as_str(), "task1");
    /// ```
    pub fn new(key: impl Into<String>) -> Self {
        RecordKey(key.into())
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(key: &str) -> Self {
        RecordKey::new(key)
    }
}

impl From<String> for RecordKey {
    fn from(key: String) -> Self {
        RecordKey(key)
    }
}

/// The contended record
///
/// Wire shape: `{ "id": <string>, "value": <string> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique key
    pub id: RecordKey,
    /// Mutable value field
    pub value: String,
}

impl Record {
    /// Create a record
    pub fn new(id: impl Into<RecordKey>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Candidate value written by attempt `index`
///
/// # Examples
///
/// ```
/// use contend_core::{candidate_value, DEFAULT_VALUE_PREFIX};
///
/// assert_eq!(candidate_value(DEFAULT_VALUE_PREFIX, 7), "value:7");
/// ```
pub fn candidate_value(prefix: &str, index: AttemptIndex) -> String {
    format!("{}{}", prefix, index)
}

/// One concurrent unit of work
///
/// An attempt starts pending and transitions to exactly one terminal
/// outcome. Only the thread running the attempt mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    index: AttemptIndex,
    candidate: String,
    outcome: Option<Outcome>,
}

impl Attempt {
    /// Create a pending attempt that writes `candidate`
    pub fn new(index: AttemptIndex, candidate: impl Into<String>) -> Self {
        Self {
            index,
            candidate: candidate.into(),
            outcome: None,
        }
    }

    /// Attempt index (1-based)
    pub fn index(&self) -> AttemptIndex {
        self.index
    }

    /// Value this attempt tries to write
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// Terminal outcome, if the attempt has finished
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Check if the attempt is still pending
    pub fn is_pending(&self) -> bool {
        self.outcome.is_none()
    }

    /// Record the terminal outcome
    ///
    /// Returns `false` and leaves the attempt untouched if it already
    /// finished.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}
