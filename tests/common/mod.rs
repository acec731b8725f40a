//! Shared helpers for probe integration tests.

#![allow(dead_code)]

use contend::prelude::*;
use std::time::Duration;

pub const INITIAL_VALUE: &str = "initial value";

/// Fresh harness on its own in-memory store
pub fn harness() -> Harness {
    Harness::open_default().expect("default harness opens")
}

/// Harness whose commits sleep `latency` after staging
pub fn slow_harness(latency: Duration) -> Harness {
    Harness::builder()
        .commit_latency(latency)
        .open()
        .expect("harness opens")
}

/// Harness with `key` already seeded
pub fn seeded(key: &str) -> (Harness, RecordKey) {
    let harness = harness();
    let key = RecordKey::new(key);
    harness.seed(&key, INITIAL_VALUE).expect("seed succeeds");
    (harness, key)
}

/// Counting invariant every run must satisfy
pub fn assert_accounted(summary: &OutcomeSummary, attempts: u32) {
    assert_eq!(
        summary.success_count + summary.conflict_count + summary.fatal_count,
        u64::from(attempts),
        "summary does not account for every attempt: {:?}",
        summary
    );
    assert_eq!(summary.conflicted_indices.len() as u64, summary.conflict_count);
    assert!(summary.conflicted_indices.windows(2).all(|w| w[0] < w[1]));
}
