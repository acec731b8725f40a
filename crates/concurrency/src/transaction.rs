//! Transaction context
//!
//! A transaction stages full-document replacements together with the
//! version of the document it observed when staging. Nothing touches
//! storage until the transaction manager commits.

use contend_core::{RecordKey, StoreError, StoreResult, TransactionOptions};
use contend_storage::Namespace;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Transaction lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Accepting operations
    Active,
    /// Writes applied to storage
    Committed,
    /// Discarded
    Aborted {
        /// Why the transaction was aborted
        reason: String,
    },
}

/// A staged replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    /// Document version observed when the write was first staged
    pub read_version: u64,
    /// Replacement value
    pub value: String,
}

/// Per-transaction state
#[derive(Debug)]
pub struct TransactionContext {
    /// Unique transaction id
    pub txn_id: u64,
    /// Namespace all writes target
    pub namespace: Namespace,
    /// Lifecycle state
    pub status: TransactionStatus,
    started_at: Instant,
    max_commit_time: Option<Duration>,
    writes: BTreeMap<RecordKey, StagedWrite>,
}

impl TransactionContext {
    /// Create an active transaction
    pub fn new(txn_id: u64, namespace: Namespace, options: &TransactionOptions) -> Self {
        Self {
            txn_id,
            namespace,
            status: TransactionStatus::Active,
            started_at: Instant::now(),
            max_commit_time: options.max_commit_time,
            writes: BTreeMap::new(),
        }
    }

    /// Check if the transaction accepts operations
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Fail with `NoSuchTransaction` unless active
    pub fn ensure_active(&self) -> StoreResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StoreError::no_such_transaction(self.txn_id))
        }
    }

    /// Time since the transaction started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Configured lifetime bound
    pub fn max_commit_time(&self) -> Option<Duration> {
        self.max_commit_time
    }

    /// Check if the transaction reached its lifetime bound
    ///
    /// A zero bound is always expired.
    pub fn is_expired(&self) -> bool {
        self.max_commit_time
            .map(|limit| self.elapsed() >= limit)
            .unwrap_or(false)
    }

    /// Stage a full replacement of `key`
    ///
    /// Re-staging a key keeps the version observed the first time, so
    /// validation still compares against the transaction's original read.
    pub fn stage_replace(
        &mut self,
        key: RecordKey,
        read_version: u64,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        self.ensure_active()?;
        let value = value.into();
        match self.writes.entry(key) {
            Entry::Occupied(mut staged) => staged.get_mut().value = value,
            Entry::Vacant(slot) => {
                slot.insert(StagedWrite {
                    read_version,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Staged writes in key order
    pub fn write_set(&self) -> impl Iterator<Item = (&RecordKey, &StagedWrite)> {
        self.writes.iter()
    }

    /// Staged writes as (key, value) pairs for storage application
    pub fn pending_writes(&self) -> Vec<(RecordKey, String)> {
        self.writes
            .iter()
            .map(|(k, w)| (k.clone(), w.value.clone()))
            .collect()
    }

    /// Mark committed
    pub fn mark_committed(&mut self) -> StoreResult<()> {
        self.ensure_active()?;
        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Mark aborted, discarding staged writes
    pub fn mark_aborted(&mut self, reason: impl Into<String>) -> StoreResult<()> {
        self.ensure_active()?;
        self.writes.clear();
        self.status = TransactionStatus::Aborted {
            reason: reason.into(),
        };
        Ok(())
    }
}
