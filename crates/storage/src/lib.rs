//! Storage layer for contend
//!
//! This crate implements the in-memory document storage behind the
//! reference store:
//! - ShardedStore: DashMap of per-namespace shards, FxHashMap within
//! - VersionedDocument: document value stamped with its commit version
//! - Version management with AtomicU64

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod namespace;
pub mod sharded;

pub use document::VersionedDocument;
pub use namespace::Namespace;
pub use sharded::ShardedStore;
