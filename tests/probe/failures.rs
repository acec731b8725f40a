//! Scenarios where attempts fail fatally.

use crate::common::*;
use contend::prelude::*;
use contend::{ConfigError, HarnessConfig};
use std::time::Duration;

#[test]
fn unseeded_key_is_fatal_for_every_attempt() {
    let harness = harness();
    let key = RecordKey::new("never-seeded");

    let run = harness.run_detailed(&key, 20);

    assert_accounted(&run.summary, 20);
    assert_eq!(run.summary.fatal_count, 20);
    assert_eq!(run.summary.conflict_count, 0);
    assert!(run.summary.conflicted_indices.is_empty());
    assert_eq!(harness.read(&key).unwrap(), None);
}

#[test]
fn unreachable_store_is_fatal() {
    let (harness, key) = seeded("task1");
    harness.store().set_reachable(false);

    let run = harness.run_detailed(&key, 12);

    assert_eq!(run.summary.fatal_count, 12);
    let detail = run.attempt(1).unwrap().outcome().unwrap().detail().unwrap();
    assert!(detail.contains("HostUnreachable"), "{}", detail);

    harness.store().set_reachable(true);
    assert_eq!(harness.read(&key).unwrap().unwrap().value, INITIAL_VALUE);
}

#[test]
fn zero_commit_deadline_is_fatal() {
    let harness = Harness::builder()
        .max_commit_time(Duration::ZERO)
        .open()
        .unwrap();
    let key = RecordKey::new("task1");
    harness.seed(&key, INITIAL_VALUE).unwrap();

    let summary = harness.run(&key, 10);

    assert_eq!(summary.fatal_count, 10);
    assert_eq!(summary.conflict_count, 0);
    assert_eq!(harness.read(&key).unwrap().unwrap().value, INITIAL_VALUE);
}

#[test]
fn unsupported_scheme_is_a_config_error() {
    let mut config = HarnessConfig::default();
    config.store.uri = "mongodb://127.0.0.1:27017".to_string();

    let err = match Harness::from_config(config) {
        Err(e) => e,
        Ok(_) => panic!("mongodb scheme must be rejected"),
    };
    assert!(matches!(err, Error::Config(ConfigError::UnsupportedScheme { .. })));
}

#[test]
fn retry_writes_is_rejected() {
    let mut config = HarnessConfig::default();
    config.store.retry_writes = true;

    assert!(matches!(
        Harness::from_config(config),
        Err(Error::Config(ConfigError::RetryWritesEnabled))
    ));
}
