//! Harness configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! config:
//!
//! ```toml
//! [store]
//! uri = "memory://localhost"
//! database = "enact"
//! collection = "test-write-conflict"
//! retry_writes = false
//! commit_latency_ms = 0
//!
//! [probe]
//! attempts = 2000
//! key = "task1"
//! initial_value = "initial value"
//! value_prefix = "value:"
//! synchronized_start = true
//! max_commit_time_ms = 5000
//! ```

use crate::error::ConfigError;
use crate::probe::ProbeOptions;
use contend_core::{TransactionOptions, DEFAULT_VALUE_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Store connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Store endpoint URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
    /// Store-side write retries; must stay false
    pub retry_writes: bool,
    /// Simulated latency between staging and commit (in-memory store only)
    pub commit_latency_ms: u64,
}

impl StoreConfig {
    /// Simulated commit latency
    pub fn commit_latency(&self) -> Duration {
        Duration::from_millis(self.commit_latency_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "memory://localhost".to_string(),
            database: "enact".to_string(),
            collection: "test-write-conflict".to_string(),
            retry_writes: false,
            commit_latency_ms: 0,
        }
    }
}

/// Probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Number of concurrent attempts
    pub attempts: u32,
    /// Record key; the driver picks a random one when unset
    pub key: Option<String>,
    /// Value the record is seeded with
    pub initial_value: String,
    /// Prefix of each attempt's candidate value
    pub value_prefix: String,
    /// Release all attempts at once after spawning
    pub synchronized_start: bool,
    /// Per-attempt transaction time limit
    pub max_commit_time_ms: Option<u64>,
}

impl ProbeConfig {
    /// Transaction options for each attempt
    pub fn transaction_options(&self) -> TransactionOptions {
        TransactionOptions {
            max_commit_time: self.max_commit_time_ms.map(Duration::from_millis),
        }
    }

    /// Probe options derived from this config
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            transaction: self.transaction_options(),
            value_prefix: self.value_prefix.clone(),
            synchronized_start: self.synchronized_start,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempts: 2000,
            key: None,
            initial_value: "initial value".to_string(),
            value_prefix: DEFAULT_VALUE_PREFIX.to_string(),
            synchronized_start: true,
            max_commit_time_ms: None,
        }
    }
}

/// Complete harness configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Store settings
    pub store: StoreConfig,
    /// Probe settings
    pub probe: ProbeConfig,
}

impl HarnessConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check invariants the probe relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.retry_writes {
            return Err(ConfigError::RetryWritesEnabled);
        }
        if self.store.database.is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.database",
                reason: "must not be empty".to_string(),
            });
        }
        if self.store.collection.is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.collection",
                reason: "must not be empty".to_string(),
            });
        }
        if matches!(self.probe.key.as_deref(), Some("")) {
            return Err(ConfigError::Invalid {
                field: "probe.key",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
