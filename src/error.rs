//! Unified error type for contend.
//!
//! Wraps the store, reporter and configuration errors of the lower crates
//! behind one enum.

use contend_core::{AttemptIndex, ErrorCode, StoreError};
use contend_engine::{ConfigError, ReportError};
use thiserror::Error;

/// All contend errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The store rejected an operation
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An attempt outcome was reported twice
    #[error("attempt {index} already reported")]
    DuplicateReport {
        /// Attempt index
        index: AttemptIndex,
    },

    /// A run was handed a reporter that already holds outcomes
    #[error("reporter already holds {recorded} outcomes")]
    ReporterInUse {
        /// Outcomes already recorded
        recorded: usize,
    },

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for contend operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a write conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Store(e) if e.is_write_conflict())
    }

    /// Check if this error is retryable.
    ///
    /// Only write conflicts are; a fresh transaction may succeed.
    pub fn is_retryable(&self) -> bool {
        self.is_conflict()
    }

    /// Check if the record was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(e) if e.has_code(ErrorCode::NO_MATCHING_DOCUMENT))
    }

    /// Store error code, if this is a store error.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Store(e) => Some(e.code),
            _ => None,
        }
    }
}

impl From<ReportError> for Error {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Duplicate { index } => Error::DuplicateReport { index },
            ReportError::InUse { recorded } => Error::ReporterInUse { recorded },
        }
    }
}
