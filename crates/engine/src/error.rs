//! Engine error types

use contend_core::AttemptIndex;
use std::path::PathBuf;
use thiserror::Error;

/// Reporter misuse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The attempt already has a recorded outcome
    #[error("attempt {index} already reported")]
    Duplicate {
        /// Attempt index reported twice
        index: AttemptIndex,
    },

    /// A run was handed a reporter that already holds outcomes
    #[error("reporter already holds {recorded} outcomes")]
    InUse {
        /// Outcomes already recorded
        recorded: usize,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML for the expected schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Store URI has no scheme
    #[error("invalid store uri '{0}'")]
    InvalidUri(String),

    /// No adapter for the URI scheme
    #[error("unsupported store scheme '{scheme}' in '{uri}'")]
    UnsupportedScheme {
        /// Scheme found in the URI
        scheme: String,
        /// Full URI
        uri: String,
    },

    /// Store-side write retries were requested
    #[error("retry_writes must be false: conflicts have to reach the probe unretried")]
    RetryWritesEnabled,

    /// Field value out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
