//! Sharded document storage
//!
//! DashMap keyed by namespace, FxHashMap within each shard.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, lock-free reads
//! - FxHashMap: O(1) lookups, fast non-crypto hash
//! - Per-Namespace: collections never contend with each other
//! - One global AtomicU64 version shared by every namespace

use crate::document::VersionedDocument;
use crate::namespace::Namespace;
use contend_core::{RecordKey, StoreError, StoreResult};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-namespace shard containing one collection's documents
#[derive(Debug, Default)]
struct Shard {
    data: FxHashMap<RecordKey, VersionedDocument>,
}

/// Sharded storage - DashMap by Namespace, HashMap within
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - get(): Lock-free read via DashMap
/// - insert_new()/apply_batch(): Only locks the target namespace's shard
///
/// Storage does not validate versions. Callers that need optimistic
/// concurrency control (the transaction manager) serialize their
/// validate-then-apply sequence themselves.
pub struct ShardedStore {
    /// Per-namespace shards
    shards: DashMap<Namespace, Shard>,
    /// Global commit version
    version: AtomicU64,
}

impl ShardedStore {
    /// Create new sharded store
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            version: AtomicU64::new(0),
        }
    }

    /// Increment version and return new value
    #[inline]
    pub fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Get a document by key
    #[inline]
    pub fn get(&self, ns: &Namespace, key: &RecordKey) -> Option<VersionedDocument> {
        self.shards
            .get(ns)
            .and_then(|shard| shard.data.get(key).cloned())
    }

    /// Insert a new document
    ///
    /// The existence check and the insert happen under the shard's write
    /// guard, so two concurrent inserts of the same key cannot both succeed.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if the key already exists. The existing document is
    /// left untouched.
    pub fn insert_new(&self, ns: &Namespace, key: RecordKey, value: &str) -> StoreResult<u64> {
        let mut shard = self.shards.entry(ns.clone()).or_insert_with(Shard::default);
        if shard.data.contains_key(&key) {
            return Err(StoreError::duplicate_key(&key));
        }

        let version = self.next_version();
        tracing::trace!(namespace = %ns, key = %key, version, "inserted document");
        shard.data.insert(key, VersionedDocument::new(value, version));
        Ok(version)
    }

    /// Apply a batch of writes to one namespace
    ///
    /// All writes are stamped with the given version.
    pub fn apply_batch(&self, ns: &Namespace, writes: &[(RecordKey, String)], version: u64) {
        let mut shard = self.shards.entry(ns.clone()).or_insert_with(Shard::default);
        for (key, value) in writes {
            shard
                .data
                .insert(key.clone(), VersionedDocument::new(value.clone(), version));
        }
    }

    /// Drop a namespace
    ///
    /// Returns true if the namespace existed and was removed.
    pub fn clear_namespace(&self, ns: &Namespace) -> bool {
        self.shards.remove(ns).is_some()
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contend_core::ErrorCode;
    use proptest::prelude::*;

    fn ns() -> Namespace {
        Namespace::new("enact", "test-write-conflict")
    }

    #[test]
    fn test_insert_and_get() {
        let store = ShardedStore::new();
        let key = RecordKey::new("task1");

        let version = store.insert_new(&ns(), key.clone(), "initial value").unwrap();
        let doc = store.get(&ns(), &key).unwrap();

        assert_eq!(version, 1);
        assert_eq!(doc.value, "initial value");
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let store = ShardedStore::new();
        let key = RecordKey::new("task1");

        store.insert_new(&ns(), key.clone(), "first").unwrap();
        let err = store.insert_new(&ns(), key.clone(), "second").unwrap_err();

        assert_eq!(err.code, ErrorCode::DUPLICATE_KEY);
        assert_eq!(store.get(&ns(), &key).unwrap().value, "first");
        assert_eq!(store.next_version(), 2);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = ShardedStore::new();
        let other = Namespace::new("enact", "other");
        let key = RecordKey::new("task1");

        store.insert_new(&ns(), key.clone(), "a").unwrap();
        store.insert_new(&other, key.clone(), "b").unwrap();

        assert_eq!(store.get(&ns(), &key).unwrap().value, "a");
        assert_eq!(store.get(&other, &key).unwrap().value, "b");
    }

    #[test]
    fn test_apply_batch_stamps_version() {
        let store = ShardedStore::new();
        let key = RecordKey::new("task1");
        store.insert_new(&ns(), key.clone(), "initial value").unwrap();

        let version = store.next_version();
        store.apply_batch(&ns(), &[(key.clone(), "value:1".to_string())], version);

        let doc = store.get(&ns(), &key).unwrap();
        assert_eq!(doc.value, "value:1");
        assert_eq!(doc.version, version);
    }

    #[test]
    fn test_clear_namespace() {
        let store = ShardedStore::new();
        let key = RecordKey::new("a");
        store.insert_new(&ns(), key.clone(), "1").unwrap();

        assert!(store.clear_namespace(&ns()));
        assert!(!store.clear_namespace(&ns()));
        assert!(store.get(&ns(), &key).is_none());
    }

    proptest! {
        #[test]
        fn prop_versions_strictly_increase(keys in proptest::collection::hash_set("[a-z]{1,8}", 1..32)) {
            let store = ShardedStore::new();
            let mut last = 0;
            for key in &keys {
                let version = store.insert_new(&ns(), RecordKey::new(key.clone()), "v").unwrap();
                prop_assert!(version > last);
                last = version;
            }
            for key in &keys {
                prop_assert!(store.get(&ns(), &RecordKey::new(key.clone())).is_some());
            }
        }
    }
}
