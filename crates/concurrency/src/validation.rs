//! Commit-time validation
//!
//! First-committer-wins: a staged write is valid only if the document still
//! carries the version the transaction observed. Any later commit to the
//! same document makes it a write-write conflict.

use crate::transaction::TransactionContext;
use contend_core::RecordKey;
use contend_storage::ShardedStore;

/// Why a staged write failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Another transaction committed to the document after it was read
    WriteWrite {
        /// Conflicting key
        key: RecordKey,
        /// Version observed when staging
        read_version: u64,
        /// Version currently in storage
        current_version: u64,
    },
    /// The document disappeared after it was read
    Missing {
        /// Missing key
        key: RecordKey,
    },
}

impl ConflictType {
    /// Key involved in the conflict
    pub fn key(&self) -> &RecordKey {
        match self {
            ConflictType::WriteWrite { key, .. } | ConflictType::Missing { key } => key,
        }
    }
}

/// Outcome of validating a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Detected conflicts
    pub fn conflicts(&self) -> &[ConflictType] {
        &self.conflicts
    }

    /// Number of detected conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Validate every staged write against current storage
pub fn validate_write_set(txn: &TransactionContext, store: &ShardedStore) -> ValidationResult {
    let conflicts = txn
        .write_set()
        .filter_map(|(key, staged)| match store.get(&txn.namespace, key) {
            None => Some(ConflictType::Missing { key: key.clone() }),
            Some(doc) if doc.version != staged.read_version => Some(ConflictType::WriteWrite {
                key: key.clone(),
                read_version: staged.read_version,
                current_version: doc.version,
            }),
            Some(_) => None,
        })
        .collect();

    ValidationResult { conflicts }
}
