//! End-to-end probe tests against the in-memory store.

#[path = "../common/mod.rs"]
mod common;

mod failures;
mod scenarios;
