//! Conflict probe
//!
//! Launches N attempts that all try to replace the same record inside
//! their own optimistic transaction, then waits for every one of them.
//!
//! ## Run Sequence
//!
//! ```text
//! 1. Spawn one thread per attempt; each blocks on the start gate
//! 2. Open the start gate (all attempts race from here)
//! 3. Each attempt: replace_in_transaction → classify → record
//! 4. Join every thread (the barrier)
//! 5. Return attempts + summary
//! ```
//!
//! Attempts are never retried and never coordinated beyond the start gate.
//! A failed spawn or a panicking attempt is recorded as fatal, so the join
//! always completes and the summary always accounts for every attempt.

use crate::classifier::OutcomeClassifier;
use crate::error::ReportError;
use crate::reporter::OutcomeReporter;
use chrono::{DateTime, Utc};
use contend_core::{
    candidate_value, Attempt, AttemptIndex, DocumentStore, Outcome, OutcomeClass,
    OutcomeSummary, RecordKey, StoreResult, TransactionOptions, DEFAULT_VALUE_PREFIX,
};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Stack size of attempt threads; attempts only hold a few small strings
const ATTEMPT_STACK_SIZE: usize = 256 * 1024;

/// Probe settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Options for each attempt's transaction
    pub transaction: TransactionOptions,
    /// Prefix of the candidate value (`<prefix><index>`)
    pub value_prefix: String,
    /// Hold every attempt until all threads are spawned
    pub synchronized_start: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            transaction: TransactionOptions::default(),
            value_prefix: DEFAULT_VALUE_PREFIX.to_string(),
            synchronized_start: true,
        }
    }
}

/// Result of one probe run
#[derive(Debug, Clone)]
pub struct ProbeRun {
    /// Contended record
    pub key: RecordKey,
    /// Every launched attempt, ordered by index
    pub attempts: Vec<Attempt>,
    /// Final summary
    pub summary: OutcomeSummary,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock end (after the join)
    pub finished_at: DateTime<Utc>,
    /// Monotonic duration of the run
    pub elapsed: Duration,
}

impl ProbeRun {
    /// Attempt by index
    pub fn attempt(&self, index: AttemptIndex) -> Option<&Attempt> {
        self.attempts
            .binary_search_by_key(&index, |a| a.index())
            .ok()
            .map(|pos| &self.attempts[pos])
    }

    /// Check if `value` is one of the candidates written by this run
    pub fn is_candidate(&self, value: &str) -> bool {
        self.attempts.iter().any(|a| a.candidate() == value)
    }
}

/// Releases waiting attempts all at once
struct StartGate {
    open: Mutex<bool>,
    cond: Condvar,
}

impl StartGate {
    fn new(open: bool) -> Self {
        Self {
            open: Mutex::new(open),
            cond: Condvar::new(),
        }
    }

    fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.cond.wait(&mut open);
        }
    }

    fn open(&self) {
        *self.open.lock() = true;
        self.cond.notify_all();
    }
}

/// Drives concurrent replace attempts against one record
///
/// The store is injected; the probe holds no connection of its own and no
/// lock around store calls.
pub struct ConflictProbe<S: ?Sized> {
    store: Arc<S>,
    classifier: OutcomeClassifier,
    options: ProbeOptions,
}

impl<S: DocumentStore + ?Sized + 'static> ConflictProbe<S> {
    /// Create a probe with default options
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            classifier: OutcomeClassifier::default(),
            options: ProbeOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: ProbeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the classifier
    pub fn with_classifier(mut self, classifier: OutcomeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Current options
    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Injected store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Seed the record the attempts will contend on
    pub fn seed(&self, key: &RecordKey, initial_value: &str) -> StoreResult<()> {
        self.store.seed(key, initial_value)
    }

    /// Run `attempt_count` attempts and return the summary
    pub fn run(&self, key: &RecordKey, attempt_count: u32) -> OutcomeSummary {
        self.run_detailed(key, attempt_count).summary
    }

    /// Run `attempt_count` attempts and return every attempt plus timing
    pub fn run_detailed(&self, key: &RecordKey, attempt_count: u32) -> ProbeRun {
        let reporter = Arc::new(OutcomeReporter::new());
        self.launch(key, attempt_count, &reporter)
    }

    /// Run against a caller-supplied reporter
    ///
    /// The reporter can be read from another thread while the run is in
    /// progress; its summary is final once this call returns.
    ///
    /// # Errors
    ///
    /// `ReportError::InUse` if the reporter already holds outcomes. Attempt
    /// indices restart at 1 on every run, so a reused reporter would mix
    /// runs.
    pub fn run_with_reporter(
        &self,
        key: &RecordKey,
        attempt_count: u32,
        reporter: &Arc<OutcomeReporter>,
    ) -> Result<ProbeRun, ReportError> {
        let recorded = reporter.recorded();
        if recorded > 0 {
            return Err(ReportError::InUse { recorded });
        }
        Ok(self.launch(key, attempt_count, reporter))
    }

    fn launch(
        &self,
        key: &RecordKey,
        attempt_count: u32,
        reporter: &Arc<OutcomeReporter>,
    ) -> ProbeRun {
        let started_at = Utc::now();
        let clock = Instant::now();

        if attempt_count == 0 {
            tracing::info!(key = %key, "no attempts requested");
            return ProbeRun {
                key: key.clone(),
                attempts: Vec::new(),
                summary: reporter.summary(),
                started_at,
                finished_at: Utc::now(),
                elapsed: clock.elapsed(),
            };
        }

        tracing::info!(key = %key, attempts = attempt_count, "starting conflict probe");

        let gate = Arc::new(StartGate::new(!self.options.synchronized_start));
        let mut attempts = Vec::with_capacity(attempt_count as usize);
        let mut handles: Vec<(AttemptIndex, JoinHandle<Attempt>)> =
            Vec::with_capacity(attempt_count as usize);

        for index in 1..=attempt_count {
            let candidate = candidate_value(&self.options.value_prefix, index);
            let worker = AttemptWorker {
                store: Arc::clone(&self.store),
                reporter: Arc::clone(reporter),
                gate: Arc::clone(&gate),
                key: key.clone(),
                classifier: self.classifier,
                transaction: self.options.transaction.clone(),
            };
            let attempt = Attempt::new(index, candidate.clone());

            let spawned = thread::Builder::new()
                .name(format!("attempt-{}", index))
                .stack_size(ATTEMPT_STACK_SIZE)
                .spawn(move || worker.run(attempt));

            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(e) => {
                    let outcome = Outcome::Fatal(format!("failed to spawn attempt thread: {}", e));
                    tracing::warn!(attempt = index, error = %e, "attempt could not be launched");
                    attempts.push(finish_unlaunched(reporter, index, candidate, outcome));
                }
            }
        }

        gate.open();

        for (index, handle) in handles {
            match handle.join() {
                Ok(attempt) => attempts.push(attempt),
                Err(_) => {
                    tracing::warn!(attempt = index, "attempt panicked");
                    let candidate = candidate_value(&self.options.value_prefix, index);
                    let outcome = reporter
                        .outcome(index)
                        .unwrap_or_else(|| Outcome::Fatal("attempt panicked".to_string()));
                    attempts.push(finish_unlaunched(reporter, index, candidate, outcome));
                }
            }
        }

        attempts.sort_by_key(|a| a.index());
        let summary = reporter.summary();
        let elapsed = clock.elapsed();

        tracing::info!(
            key = %key,
            success = summary.success_count,
            conflict = summary.conflict_count,
            fatal = summary.fatal_count,
            elapsed_ms = elapsed.as_millis() as u64,
            "conflict probe finished"
        );

        ProbeRun {
            key: key.clone(),
            attempts,
            summary,
            started_at,
            finished_at: Utc::now(),
            elapsed,
        }
    }
}

/// Everything one attempt thread needs
struct AttemptWorker<S: ?Sized> {
    store: Arc<S>,
    reporter: Arc<OutcomeReporter>,
    gate: Arc<StartGate>,
    key: RecordKey,
    classifier: OutcomeClassifier,
    transaction: TransactionOptions,
}

impl<S: DocumentStore + ?Sized> AttemptWorker<S> {
    fn run(self, mut attempt: Attempt) -> Attempt {
        self.gate.wait();

        let result =
            self.store
                .replace_in_transaction(&self.key, attempt.candidate(), &self.transaction);
        let outcome = self.classifier.outcome(&result);

        match outcome.class() {
            OutcomeClass::Success => {
                tracing::debug!(attempt = attempt.index(), "attempt committed");
            }
            OutcomeClass::Conflict => {
                tracing::debug!(
                    attempt = attempt.index(),
                    error = outcome.detail().unwrap_or_default(),
                    "write conflict"
                );
            }
            OutcomeClass::Fatal => {
                tracing::warn!(
                    attempt = attempt.index(),
                    error = outcome.detail().unwrap_or_default(),
                    "attempt failed"
                );
            }
        }

        record_outcome(&self.reporter, attempt.index(), &outcome);
        attempt.finish(outcome);
        attempt
    }
}

/// Build the terminal attempt for one that never ran to completion
fn finish_unlaunched(
    reporter: &OutcomeReporter,
    index: AttemptIndex,
    candidate: String,
    outcome: Outcome,
) -> Attempt {
    if reporter.outcome(index).is_none() {
        record_outcome(reporter, index, &outcome);
    }
    let mut attempt = Attempt::new(index, candidate);
    attempt.finish(outcome);
    attempt
}

fn record_outcome(reporter: &OutcomeReporter, index: AttemptIndex, outcome: &Outcome) {
    if let Err(e) = reporter.record(index, outcome.clone()) {
        tracing::error!(attempt = index, error = %e, "reporter rejected outcome");
    }
}
