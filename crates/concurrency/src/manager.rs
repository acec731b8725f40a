//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating:
//! 1. Lifetime check (max commit time)
//! 2. Validation (first-committer-wins)
//! 3. Storage application (visibility)
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. Acquire commit lock
//! 2. IF expired: abort, return MaxTimeMSExpired
//! 3. validate_write_set() - check for conflicts
//! 4. IF conflicts: abort, return WriteConflict
//! 5. Allocate commit_version (increment global version)
//! 6. apply_batch() to storage
//! 7. mark_committed(), return Ok(commit_version)
//! ```
//!
//! A rejected transaction is aborted, never retried.

use crate::transaction::TransactionContext;
use crate::validation::validate_write_set;
use contend_core::{StoreError, TransactionOptions};
use contend_storage::{Namespace, ShardedStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of commit/abort counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionMetrics {
    /// Transactions begun
    pub total_started: u64,
    /// Transactions committed
    pub total_committed: u64,
    /// Transactions aborted (conflict, expiry, or explicit abort)
    pub total_aborted: u64,
    /// Transactions aborted by a write conflict
    pub total_conflicts: u64,
}

/// Manages transaction lifecycle and atomic commits
///
/// # Thread Safety
///
/// The commit operation is serialized via an internal lock to prevent TOCTOU
/// (time-of-check-to-time-of-use) races between validation and storage
/// application. The lock covers only validate-then-apply; staging a write
/// takes no lock, which is what lets concurrent transactions race.
pub struct TransactionManager {
    /// Next transaction ID
    next_txn_id: AtomicU64,

    /// Commit serialization lock
    ///
    /// Without this lock the following race can occur:
    /// 1. T1 validates (succeeds, document at v1)
    /// 2. T2 validates (succeeds, document still at v1)
    /// 3. T1 applies (document now at v2)
    /// 4. T2 applies (uses stale validation from step 2)
    commit_lock: Mutex<()>,

    started: AtomicU64,
    committed: AtomicU64,
    aborted: AtomicU64,
    conflicts: AtomicU64,
}

impl TransactionManager {
    /// Create a new transaction manager
    pub fn new() -> Self {
        TransactionManager {
            next_txn_id: AtomicU64::new(1),
            commit_lock: Mutex::new(()),
            started: AtomicU64::new(0),
            committed: AtomicU64::new(0),
            aborted: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
        }
    }

    /// Allocate next transaction ID
    pub fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Begin a transaction on `namespace`
    pub fn begin(&self, namespace: Namespace, options: &TransactionOptions) -> TransactionContext {
        self.started.fetch_add(1, Ordering::Relaxed);
        TransactionContext::new(self.next_txn_id(), namespace, options)
    }

    /// Commit a transaction atomically
    ///
    /// # Returns
    /// - Ok(commit_version) on success
    /// - Err(NoSuchTransaction) if the transaction is not active
    /// - Err(MaxTimeMSExpired) if the transaction outlived its bound
    /// - Err(WriteConflict) if another transaction committed to a staged
    ///   document first
    pub fn commit(
        &self,
        txn: &mut TransactionContext,
        store: &ShardedStore,
    ) -> Result<u64, StoreError> {
        txn.ensure_active()?;

        let _commit_guard = self.commit_lock.lock();

        if txn.is_expired() {
            let limit_ms = txn
                .max_commit_time()
                .map(|limit| limit.as_millis())
                .unwrap_or_default();
            self.abort_with(txn, "max commit time exceeded");
            return Err(StoreError::max_time_expired(txn.txn_id, limit_ms));
        }

        let validation = validate_write_set(txn, store);
        if let Some(conflict) = validation.conflicts().first() {
            let err = StoreError::write_conflict(conflict.key());
            tracing::trace!(
                txn_id = txn.txn_id,
                conflicts = validation.conflict_count(),
                "commit rejected by validation"
            );
            self.conflicts.fetch_add(1, Ordering::Relaxed);
            self.abort_with(txn, err.message.clone());
            return Err(err);
        }

        let commit_version = store.next_version();
        store.apply_batch(&txn.namespace, &txn.pending_writes(), commit_version);
        txn.mark_committed()?;
        self.committed.fetch_add(1, Ordering::Relaxed);

        tracing::trace!(txn_id = txn.txn_id, commit_version, "transaction committed");
        Ok(commit_version)
    }

    /// Explicitly abort a transaction
    ///
    /// All staged writes are discarded.
    pub fn abort(&self, txn: &mut TransactionContext, reason: &str) -> Result<(), StoreError> {
        txn.mark_aborted(reason)?;
        self.aborted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn abort_with(&self, txn: &mut TransactionContext, reason: impl Into<String>) {
        if txn.mark_aborted(reason).is_ok() {
            self.aborted.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current counters
    pub fn metrics(&self) -> TransactionMetrics {
        TransactionMetrics {
            total_started: self.started.load(Ordering::Relaxed),
            total_committed: self.committed.load(Ordering::Relaxed),
            total_aborted: self.aborted.load(Ordering::Relaxed),
            total_conflicts: self.conflicts.load(Ordering::Relaxed),
        }
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionStatus;
    use contend_core::{ErrorCode, RecordKey, TRANSIENT_TRANSACTION_ERROR};
    use proptest::prelude::*;
    use std::time::Duration;

    fn setup() -> (TransactionManager, ShardedStore, Namespace, RecordKey) {
        let store = ShardedStore::new();
        let ns = Namespace::new("enact", "test-write-conflict");
        let key = RecordKey::new("task1");
        store.insert_new(&ns, key.clone(), "initial value").unwrap();
        (TransactionManager::new(), store, ns, key)
    }

    fn stage(
        manager: &TransactionManager,
        store: &ShardedStore,
        ns: &Namespace,
        key: &RecordKey,
        value: &str,
        options: &TransactionOptions,
    ) -> TransactionContext {
        let mut txn = manager.begin(ns.clone(), options);
        let current = store.get(ns, key).unwrap();
        txn.stage_replace(key.clone(), current.version, value).unwrap();
        txn
    }

    #[test]
    fn test_interleaved_second_committer_conflicts() {
        let (manager, store, ns, key) = setup();
        let options = TransactionOptions::default();

        let mut t1 = stage(&manager, &store, &ns, &key, "value:1", &options);
        let mut t2 = stage(&manager, &store, &ns, &key, "value:2", &options);

        manager.commit(&mut t1, &store).unwrap();
        let err = manager.commit(&mut t2, &store).unwrap_err();

        assert_eq!(err.code, ErrorCode::WRITE_CONFLICT);
        assert!(err.has_label(TRANSIENT_TRANSACTION_ERROR));
        assert!(matches!(t2.status, TransactionStatus::Aborted { .. }));
        assert_eq!(store.get(&ns, &key).unwrap().value, "value:1");

        let metrics = manager.metrics();
        assert_eq!(metrics.total_started, 2);
        assert_eq!(metrics.total_committed, 1);
        assert_eq!(metrics.total_aborted, 1);
        assert_eq!(metrics.total_conflicts, 1);
    }

    #[test]
    fn test_expired_transaction_aborts() {
        let (manager, store, ns, key) = setup();
        let options = TransactionOptions::with_max_commit_time(Duration::ZERO);

        let mut txn = stage(&manager, &store, &ns, &key, "value:1", &options);
        let err = manager.commit(&mut txn, &store).unwrap_err();

        assert_eq!(err.code, ErrorCode::MAX_TIME_MS_EXPIRED);
        assert_eq!(store.get(&ns, &key).unwrap().value, "initial value");
        assert_eq!(manager.metrics().total_conflicts, 0);
    }

    #[test]
    fn test_commit_twice_is_no_such_transaction() {
        let (manager, store, ns, key) = setup();
        let mut txn = stage(&manager, &store, &ns, &key, "value:1", &TransactionOptions::default());

        manager.commit(&mut txn, &store).unwrap();
        let err = manager.commit(&mut txn, &store).unwrap_err();

        assert_eq!(err.code, ErrorCode::NO_SUCH_TRANSACTION);
    }

    #[test]
    fn test_explicit_abort_discards_writes() {
        let (manager, store, ns, key) = setup();
        let mut txn = stage(&manager, &store, &ns, &key, "value:1", &TransactionOptions::default());

        manager.abort(&mut txn, "caller gave up").unwrap();

        assert_eq!(store.get(&ns, &key).unwrap().value, "initial value");
        assert!(manager.commit(&mut txn, &store).is_err());
    }

    proptest! {
        #[test]
        fn prop_sequential_commits_never_conflict(values in proptest::collection::vec("[a-z0-9]{1,6}", 1..20)) {
            let (manager, store, ns, key) = setup();
            let options = TransactionOptions::default();

            for value in &values {
                let mut txn = stage(&manager, &store, &ns, &key, value, &options);
                prop_assert!(manager.commit(&mut txn, &store).is_ok());
            }

            prop_assert_eq!(&store.get(&ns, &key).unwrap().value, values.last().unwrap());
            prop_assert_eq!(manager.metrics().total_committed, values.len() as u64);
        }
    }
}
