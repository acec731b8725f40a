//! In-memory reference store
//!
//! `MemoryStore` plays the role of a document database server: namespaced
//! collections, optimistic transactions, structured error codes. A
//! `CollectionHandle` is the `DocumentStore` adapter bound to one
//! collection.
//!
//! ## Replace Sequence
//!
//! ```text
//! 1. Open a session (random id, used for tracing only)
//! 2. begin() transaction
//! 3. Read current document, stage replacement with the observed version
//! 4. Simulated commit latency, if configured
//! 5. commit(): validate version under the commit lock, apply or abort
//! ```
//!
//! The race window is steps 3-5. Two transactions that both read version
//! v and both try to commit produce exactly one commit and one
//! `WriteConflict`.

use crate::config::StoreConfig;
use crate::error::ConfigError;
use contend_concurrency::{TransactionManager, TransactionMetrics};
use contend_core::{
    DocumentStore, Record, RecordKey, StoreError, StoreResult, TransactionOptions,
};
use contend_storage::{Namespace, ShardedStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// URI scheme served by [`MemoryStore`]
pub const MEMORY_SCHEME: &str = "memory";

/// In-process document store with optimistic transactions
pub struct MemoryStore {
    host: String,
    storage: ShardedStore,
    manager: TransactionManager,
    reachable: AtomicBool,
    commit_latency: Duration,
}

impl MemoryStore {
    /// Create a store reachable as `memory://<host>`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            storage: ShardedStore::new(),
            manager: TransactionManager::new(),
            reachable: AtomicBool::new(true),
            commit_latency: Duration::ZERO,
        }
    }

    /// Sleep this long between staging and committing each transaction
    pub fn with_commit_latency(mut self, latency: Duration) -> Self {
        self.commit_latency = latency;
        self
    }

    /// Open a store from configuration
    ///
    /// # Errors
    ///
    /// `InvalidUri` without a `scheme://` prefix, `UnsupportedScheme` for
    /// anything but `memory`.
    pub fn connect(config: &StoreConfig) -> Result<Arc<Self>, ConfigError> {
        let (scheme, rest) = config
            .uri
            .split_once("://")
            .ok_or_else(|| ConfigError::InvalidUri(config.uri.clone()))?;
        if scheme != MEMORY_SCHEME {
            return Err(ConfigError::UnsupportedScheme {
                scheme: scheme.to_string(),
                uri: config.uri.clone(),
            });
        }

        let host = match rest.trim_end_matches('/') {
            "" => "localhost",
            host => host,
        };
        tracing::debug!(host, database = %config.database, "opened in-memory store");
        Ok(Arc::new(
            Self::new(host).with_commit_latency(config.commit_latency()),
        ))
    }

    /// Endpoint URI
    pub fn endpoint(&self) -> String {
        format!("{}://{}", MEMORY_SCHEME, self.host)
    }

    /// Adapter bound to one collection
    pub fn collection(
        self: &Arc<Self>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> CollectionHandle {
        CollectionHandle {
            store: Arc::clone(self),
            namespace: Namespace::new(database, collection),
        }
    }

    /// Simulate losing (or regaining) the connection
    ///
    /// While unreachable every operation fails with `HostUnreachable`.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Check if the store accepts operations
    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    /// Transaction counters
    pub fn metrics(&self) -> TransactionMetrics {
        self.manager.metrics()
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if self.is_reachable() {
            Ok(())
        } else {
            Err(StoreError::host_unreachable(self.endpoint()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("localhost")
    }
}

/// `DocumentStore` adapter for one collection of a [`MemoryStore`]
#[derive(Clone)]
pub struct CollectionHandle {
    store: Arc<MemoryStore>,
    namespace: Namespace,
}

impl CollectionHandle {
    /// Collection namespace
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Store hosting the collection
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }
}

impl DocumentStore for CollectionHandle {
    fn seed(&self, key: &RecordKey, initial_value: &str) -> StoreResult<()> {
        self.store.check_reachable()?;
        self.store
            .storage
            .insert_new(&self.namespace, key.clone(), initial_value)
            .map(|_| ())
    }

    fn read(&self, key: &RecordKey) -> StoreResult<Option<Record>> {
        self.store.check_reachable()?;
        Ok(self
            .store
            .storage
            .get(&self.namespace, key)
            .map(|doc| doc.to_record(key)))
    }

    fn replace_in_transaction(
        &self,
        key: &RecordKey,
        value: &str,
        options: &TransactionOptions,
    ) -> StoreResult<()> {
        self.store.check_reachable()?;

        let session_id = Uuid::new_v4();
        let manager = &self.store.manager;
        let mut txn = manager.begin(self.namespace.clone(), options);
        let span = tracing::trace_span!("transaction", %session_id, txn_id = txn.txn_id);
        let _enter = span.enter();

        let Some(current) = self.store.storage.get(&self.namespace, key) else {
            let _ = manager.abort(&mut txn, "no matching document");
            return Err(StoreError::no_matching_document(key));
        };
        txn.stage_replace(key.clone(), current.version, value)?;

        if !self.store.commit_latency.is_zero() {
            std::thread::sleep(self.store.commit_latency);
        }

        if let Err(err) = self.store.check_reachable() {
            let _ = manager.abort(&mut txn, "connection lost before commit");
            return Err(err);
        }

        manager.commit(&mut txn, &self.store.storage).map(|_| ())
    }
}
