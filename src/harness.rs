//! Main entry point for contend.
//!
//! `Harness` binds a probe to one collection of an in-memory store opened
//! from a [`HarnessConfig`].

use crate::error::Result;
use contend_core::{DocumentStore, OutcomeSummary, Record, RecordKey};
use contend_engine::{
    CollectionHandle, ConflictProbe, HarnessConfig, MemoryStore, OutcomeReporter, ProbeRun,
};
use std::sync::Arc;
use std::time::Duration;

/// A probe bound to one store collection.
///
/// # Example
///
/// ```
/// use contend::prelude::*;
///
/// let harness = Harness::builder().collection("enact", "docs").open()?;
/// let key = RecordKey::new("task1");
///
/// harness.seed(&key, "initial value")?;
/// let summary = harness.run(&key, 20);
///
/// assert_eq!(summary.total(), 20);
/// # Ok::<(), contend::Error>(())
/// ```
pub struct Harness {
    store: Arc<MemoryStore>,
    probe: ConflictProbe<CollectionHandle>,
    config: HarnessConfig,
}

impl Harness {
    /// Open a harness with default settings.
    pub fn open_default() -> Result<Self> {
        Self::builder().open()
    }

    /// Open a harness from a configuration.
    pub fn from_config(config: HarnessConfig) -> Result<Self> {
        Self::builder().config(config).open()
    }

    /// Create a builder.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::new()
    }

    /// Seed the contended record.
    ///
    /// Fails with `DuplicateKey` if it already exists.
    pub fn seed(&self, key: &RecordKey, initial_value: &str) -> Result<()> {
        self.probe.seed(key, initial_value).map_err(Into::into)
    }

    /// Run `attempt_count` concurrent attempts and return the summary.
    pub fn run(&self, key: &RecordKey, attempt_count: u32) -> OutcomeSummary {
        self.probe.run(key, attempt_count)
    }

    /// Run and return every attempt plus timing.
    pub fn run_detailed(&self, key: &RecordKey, attempt_count: u32) -> ProbeRun {
        self.probe.run_detailed(key, attempt_count)
    }

    /// Run against a reporter the caller can observe while attempts finish.
    ///
    /// The reporter must be empty.
    pub fn run_with_reporter(
        &self,
        key: &RecordKey,
        attempt_count: u32,
        reporter: &Arc<OutcomeReporter>,
    ) -> Result<ProbeRun> {
        self.probe
            .run_with_reporter(key, attempt_count, reporter)
            .map_err(Into::into)
    }

    /// Read the record's current state.
    pub fn read(&self, key: &RecordKey) -> Result<Option<Record>> {
        self.probe.store().read(key).map_err(Into::into)
    }

    /// Underlying probe.
    pub fn probe(&self) -> &ConflictProbe<CollectionHandle> {
        &self.probe
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Configuration the harness was opened with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }
}

/// Builder for a [`Harness`].
///
/// # Example
///
/// ```
/// use contend::prelude::*;
/// use std::time::Duration;
///
/// let harness = Harness::builder()
///     .collection("enact", "test-write-conflict")
///     .commit_latency(Duration::from_millis(1))
///     .max_commit_time(Duration::from_secs(5))
///     .open()?;
/// # Ok::<(), contend::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HarnessBuilder {
    config: HarnessConfig,
}

impl HarnessBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the database and collection.
    pub fn collection(mut self, database: impl Into<String>, collection: impl Into<String>) -> Self {
        self.config.store.database = database.into();
        self.config.store.collection = collection.into();
        self
    }

    /// Simulated latency between staging and commit.
    pub fn commit_latency(mut self, latency: Duration) -> Self {
        self.config.store.commit_latency_ms = saturating_millis(latency);
        self
    }

    /// Per-attempt transaction time limit.
    pub fn max_commit_time(mut self, limit: Duration) -> Self {
        self.config.probe.max_commit_time_ms = Some(saturating_millis(limit));
        self
    }

    /// Candidate value prefix.
    pub fn value_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.probe.value_prefix = prefix.into();
        self
    }

    /// Validate the configuration, connect and bind the probe.
    pub fn open(self) -> Result<Harness> {
        let config = self.config;
        config.validate()?;

        let store = MemoryStore::connect(&config.store)?;
        let collection = store.collection(&config.store.database, &config.store.collection);
        let probe = ConflictProbe::new(Arc::new(collection)).with_options(config.probe.probe_options());

        tracing::debug!(
            endpoint = %store.endpoint(),
            namespace = %probe.store().namespace(),
            "harness opened"
        );

        Ok(Harness {
            store,
            probe,
            config,
        })
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
