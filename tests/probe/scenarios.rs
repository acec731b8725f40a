//! Healthy-store scenarios.

use crate::common::*;
use contend::prelude::*;
use contend::{candidate_value, DEFAULT_VALUE_PREFIX};
use proptest::prelude::*;
use std::time::Duration;

#[test]
fn two_hundred_attempts_on_task1() {
    let (harness, key) = seeded("task1");

    let run = harness.run_detailed(&key, 200);

    assert_accounted(&run.summary, 200);
    assert_eq!(run.summary.fatal_count, 0);
    assert!(run.summary.success_count >= 1);

    let record = harness.read(&key).unwrap().unwrap();
    assert_eq!(record.id, key);
    assert!(
        run.is_candidate(&record.value),
        "final value {:?} was not written by any attempt",
        record.value
    );
    assert!(record.value.starts_with(DEFAULT_VALUE_PREFIX));
}

#[test]
fn zero_attempts_leaves_record_untouched() {
    let (harness, key) = seeded("task1");

    let summary = harness.run(&key, 0);

    assert_eq!(summary, OutcomeSummary::default());
    assert_eq!(harness.read(&key).unwrap().unwrap().value, INITIAL_VALUE);
    assert_eq!(harness.store().metrics().total_started, 0);
}

#[test]
fn seeding_twice_fails_and_keeps_value() {
    let (harness, key) = seeded("task1");

    let err = harness.seed(&key, "second").unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::DUPLICATE_KEY));
    assert!(!err.is_conflict());
    assert_eq!(harness.read(&key).unwrap().unwrap().value, INITIAL_VALUE);
}

#[test]
fn slow_commits_produce_conflicts() {
    let harness = slow_harness(Duration::from_millis(2));
    let key = RecordKey::new("task1");
    harness.seed(&key, INITIAL_VALUE).unwrap();

    let run = harness.run_detailed(&key, 50);

    assert_accounted(&run.summary, 50);
    assert_eq!(run.summary.fatal_count, 0);
    if run.summary.conflict_count == 0 {
        eprintln!("no conflicts observed in 50 attempts; scheduling serialized every commit");
    }
    for index in &run.summary.conflicted_indices {
        let detail = run.attempt(*index).unwrap().outcome().unwrap().detail().unwrap();
        assert!(detail.contains("WriteConflict"), "{}", detail);
    }
}

#[test]
fn store_metrics_match_summary() {
    let (harness, key) = seeded("task1");

    let summary = harness.run(&key, 40);

    let metrics = harness.store().metrics();
    assert_eq!(metrics.total_started, 40);
    assert_eq!(metrics.total_committed, summary.success_count);
    assert_eq!(metrics.total_conflicts, summary.conflict_count);
}

#[test]
fn observer_reporter_sees_every_attempt() {
    let (harness, key) = seeded("task1");
    let reporter = std::sync::Arc::new(OutcomeReporter::new());

    let run = harness.run_with_reporter(&key, 30, &reporter).unwrap();

    assert_eq!(reporter.recorded(), 30);
    assert_eq!(reporter.summary(), run.summary);
}

#[test]
fn second_run_on_same_reporter_is_rejected() {
    let (harness, key) = seeded("task1");
    let reporter = std::sync::Arc::new(OutcomeReporter::new());

    let first = harness.run_with_reporter(&key, 5, &reporter).unwrap();
    let err = harness.run_with_reporter(&key, 20, &reporter).unwrap_err();

    assert!(matches!(err, Error::ReporterInUse { recorded: 5 }));
    assert_eq!(reporter.summary(), first.summary);
    assert_eq!(harness.store().metrics().total_started, 5);

    let second = harness.run(&key, 20);
    assert_accounted(&second, 20);
}

#[test]
fn attempts_are_ordered_and_finished() {
    let (harness, key) = seeded("task2");

    let run = harness.run_detailed(&key, 16);

    assert_eq!(run.attempts.len(), 16);
    for (i, attempt) in run.attempts.iter().enumerate() {
        assert_eq!(attempt.index(), i as u32 + 1);
        assert_eq!(attempt.candidate(), candidate_value(DEFAULT_VALUE_PREFIX, attempt.index()));
        assert!(!attempt.is_pending());
    }
    assert!(run.finished_at >= run.started_at);
}

#[test]
fn summary_wire_shape() {
    let (harness, key) = seeded("task1");
    let summary = harness.run(&key, 3);

    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["success_count"].as_u64().unwrap(), summary.success_count);
    assert!(json["conflicted_indices"].is_array());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_every_attempt_accounted(attempts in 0u32..40) {
        let (harness, key) = seeded("task1");

        let summary = harness.run(&key, attempts);

        prop_assert_eq!(summary.total(), u64::from(attempts));
        prop_assert_eq!(summary.fatal_count, 0);
        prop_assert_eq!(summary.success_count >= 1, attempts > 0);
    }
}
