//! Structured store errors
//!
//! Every failure a [`DocumentStore`](crate::DocumentStore) surfaces is a
//! [`StoreError`] carrying a numeric condition code. The code is the stable
//! contract; the message is for humans and may change between store
//! versions.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "code": 112,
//!   "codeName": "WriteConflict",
//!   "errmsg": "write conflict on task1",
//!   "errorLabels": ["TransientTransactionError"]
//! }
//! ```
//!
//! ## Condition Codes
//!
//! | Code | Name | Class |
//! |------|------|-------|
//! | 1 | InternalError | fatal |
//! | 2 | BadValue | fatal |
//! | 6 | HostUnreachable | fatal |
//! | 47 | NoMatchingDocument | fatal |
//! | 50 | MaxTimeMSExpired | fatal |
//! | 89 | NetworkTimeout | fatal |
//! | 112 | WriteConflict | conflict |
//! | 251 | NoSuchTransaction | fatal |
//! | 11000 | DuplicateKey | fatal |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label the store attaches to errors after which the whole transaction may
/// be retried by the caller
pub const TRANSIENT_TRANSACTION_ERROR: &str = "TransientTransactionError";

/// Numeric condition code reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    /// Unexpected server-side failure
    pub const INTERNAL_ERROR: ErrorCode = ErrorCode(1);
    /// Malformed request
    pub const BAD_VALUE: ErrorCode = ErrorCode(2);
    /// Store endpoint could not be reached
    pub const HOST_UNREACHABLE: ErrorCode = ErrorCode(6);
    /// No record matched the key
    pub const NO_MATCHING_DOCUMENT: ErrorCode = ErrorCode(47);
    /// Operation exceeded its time limit
    pub const MAX_TIME_MS_EXPIRED: ErrorCode = ErrorCode(50);
    /// Network round trip timed out
    pub const NETWORK_TIMEOUT: ErrorCode = ErrorCode(89);
    /// Optimistic concurrency control rejected the write
    pub const WRITE_CONFLICT: ErrorCode = ErrorCode(112);
    /// Transaction is not active (already committed or aborted)
    pub const NO_SUCH_TRANSACTION: ErrorCode = ErrorCode(251);
    /// Unique key already exists
    pub const DUPLICATE_KEY: ErrorCode = ErrorCode(11000);

    /// Raw numeric value
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Canonical name of a known code, `"Unknown"` otherwise
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::INTERNAL_ERROR => "InternalError",
            ErrorCode::BAD_VALUE => "BadValue",
            ErrorCode::HOST_UNREACHABLE => "HostUnreachable",
            ErrorCode::NO_MATCHING_DOCUMENT => "NoMatchingDocument",
            ErrorCode::MAX_TIME_MS_EXPIRED => "MaxTimeMSExpired",
            ErrorCode::NETWORK_TIMEOUT => "NetworkTimeout",
            ErrorCode::WRITE_CONFLICT => "WriteConflict",
            ErrorCode::NO_SUCH_TRANSACTION => "NoSuchTransaction",
            ErrorCode::DUPLICATE_KEY => "DuplicateKey",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A failure reported by the store
///
/// This is the single structured view of a store failure. Classification
/// reads [`StoreError::code`] and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{} ({}): {}", .code.name(), .code, .message)]
pub struct StoreError {
    /// Condition code
    pub code: ErrorCode,
    /// Human-readable message
    #[serde(rename = "errmsg")]
    pub message: String,
    /// Error labels attached by the store
    #[serde(rename = "errorLabels", default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create an unlabelled error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            labels: Vec::new(),
        }
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Write conflict on `key`, labelled transient
    pub fn write_conflict(key: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::WRITE_CONFLICT,
            format!("write conflict on {}", key),
        )
        .with_label(TRANSIENT_TRANSACTION_ERROR)
    }

    /// Key already exists
    pub fn duplicate_key(key: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::DUPLICATE_KEY,
            format!("duplicate key: {}", key),
        )
    }

    /// No record with `key`
    pub fn no_matching_document(key: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::NO_MATCHING_DOCUMENT,
            format!("no record matches key {}", key),
        )
    }

    /// Store endpoint unreachable
    pub fn host_unreachable(endpoint: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::HOST_UNREACHABLE,
            format!("host unreachable: {}", endpoint),
        )
    }

    /// Transaction exceeded its time limit
    pub fn max_time_expired(txn_id: u64, limit_ms: u128) -> Self {
        Self::new(
            ErrorCode::MAX_TIME_MS_EXPIRED,
            format!("transaction {} exceeded time limit of {}ms", txn_id, limit_ms),
        )
    }

    /// Transaction is not active
    pub fn no_such_transaction(txn_id: u64) -> Self {
        Self::new(
            ErrorCode::NO_SUCH_TRANSACTION,
            format!("transaction {} is not active", txn_id),
        )
    }

    /// Internal store failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message)
    }

    /// Check the condition code
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    /// Check for a label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Check if this is a write conflict
    pub fn is_write_conflict(&self) -> bool {
        self.has_code(ErrorCode::WRITE_CONFLICT)
    }

    /// Encode to the wire format, including the code name
    pub fn to_wire(&self) -> serde_json::Value {
        let mut wire = serde_json::json!({
            "code": self.code.as_i32(),
            "codeName": self.code.name(),
            "errmsg": self.message,
        });
        if !self.labels.is_empty() {
            wire["errorLabels"] = serde_json::json!(self.labels);
        }
        wire
    }
}
