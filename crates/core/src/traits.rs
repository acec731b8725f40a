//! Store adapter trait
//!
//! [`DocumentStore`] is the seam between the probe and whatever holds the
//! contended record. The probe never sees connections, sessions, or
//! collections; it only sees these three operations and [`StoreError`].
//!
//! [`StoreError`]: crate::StoreError

use crate::error::StoreResult;
use crate::types::{Record, RecordKey};
use std::sync::Arc;
use std::time::Duration;

/// Options applied to a single transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Upper bound on the transaction's lifetime, checked at commit
    ///
    /// A transaction that reaches the bound aborts with `MaxTimeMSExpired`.
    pub max_commit_time: Option<Duration>,
}

impl TransactionOptions {
    /// Options with a commit-time bound
    pub fn with_max_commit_time(max_commit_time: Duration) -> Self {
        Self {
            max_commit_time: Some(max_commit_time),
        }
    }
}

/// Adapter over the store holding the contended record
///
/// # Contract
///
/// - `seed` creates the record and fails with `DuplicateKey` if the key
///   exists; it never overwrites.
/// - `replace_in_transaction` replaces the whole record inside a
///   transaction using optimistic concurrency control. A concurrent commit
///   detected at commit time surfaces as `WriteConflict`. Implementations
///   must not retry internally.
/// - A missing record is reported as `NoMatchingDocument`, never as a
///   conflict.
///
/// Implementations are shared across attempt threads.
pub trait DocumentStore: Send + Sync {
    /// Create the record with its initial value
    fn seed(&self, key: &RecordKey, initial_value: &str) -> StoreResult<()>;

    /// Read the current record
    fn read(&self, key: &RecordKey) -> StoreResult<Option<Record>>;

    /// Replace the record's value inside an optimistic transaction
    fn replace_in_transaction(
        &self,
        key: &RecordKey,
        value: &str,
        options: &TransactionOptions,
    ) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn seed(&self, key: &RecordKey, initial_value: &str) -> StoreResult<()> {
        (**self).seed(key, initial_value)
    }

    fn read(&self, key: &RecordKey) -> StoreResult<Option<Record>> {
        (**self).read(key)
    }

    fn replace_in_transaction(
        &self,
        key: &RecordKey,
        value: &str,
        options: &TransactionOptions,
    ) -> StoreResult<()> {
        (**self).replace_in_transaction(key, value, options)
    }
}
