//! Versioned document

use contend_core::{Record, RecordKey};

/// A stored document value with the version that last wrote it
///
/// `version` is the store-wide commit version, so it strictly increases
/// with every write to the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDocument {
    /// Current value
    pub value: String,
    /// Commit version of the last write
    pub version: u64,
    /// Unix timestamp (seconds) of the last write
    pub timestamp: i64,
}

impl VersionedDocument {
    /// Create a document stamped with the current time
    pub fn new(value: impl Into<String>, version: u64) -> Self {
        Self {
            value: value.into(),
            version,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Wire-level record for `key`
    pub fn to_record(&self, key: &RecordKey) -> Record {
        Record::new(key.clone(), self.value.clone())
    }
}
