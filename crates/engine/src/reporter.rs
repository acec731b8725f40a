//! Outcome aggregation
//!
//! Completing attempts report concurrently; every update happens under one
//! mutex so counts and the conflicted-index list never diverge.

use crate::error::ReportError;
use contend_core::{AttemptIndex, Outcome, OutcomeClass, OutcomeSummary};
use parking_lot::Mutex;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct ReporterState {
    outcomes: BTreeMap<AttemptIndex, Outcome>,
    summary: OutcomeSummary,
}

/// Thread-safe tally of attempt outcomes
///
/// `summary()` may be called at any time and reflects the attempts recorded
/// so far.
#[derive(Debug, Default)]
pub struct OutcomeReporter {
    state: Mutex<ReporterState>,
}

impl OutcomeReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one attempt
    ///
    /// # Errors
    ///
    /// `ReportError::Duplicate` if `index` was already recorded. The summary
    /// is left unchanged.
    pub fn record(&self, index: AttemptIndex, outcome: Outcome) -> Result<(), ReportError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let slot = match state.outcomes.entry(index) {
            Entry::Occupied(_) => return Err(ReportError::Duplicate { index }),
            Entry::Vacant(slot) => slot,
        };

        match outcome.class() {
            OutcomeClass::Success => state.summary.success_count += 1,
            OutcomeClass::Fatal => state.summary.fatal_count += 1,
            OutcomeClass::Conflict => {
                state.summary.conflict_count += 1;
                let conflicted = &mut state.summary.conflicted_indices;
                if let Err(pos) = conflicted.binary_search(&index) {
                    conflicted.insert(pos, index);
                }
            }
        }
        slot.insert(outcome);
        Ok(())
    }

    /// Current summary
    pub fn summary(&self) -> OutcomeSummary {
        self.state.lock().summary.clone()
    }

    /// Recorded outcome of one attempt
    pub fn outcome(&self, index: AttemptIndex) -> Option<Outcome> {
        self.state.lock().outcomes.get(&index).cloned()
    }

    /// Number of recorded attempts
    pub fn recorded(&self) -> usize {
        self.state.lock().outcomes.len()
    }
}
