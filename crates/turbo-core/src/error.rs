//! Error handling for the Turbo collection
//!
//! Every fallible operation returns a [`CollectionResult`]. Failures are local
//! to the call that produced them and leave the collection unchanged; none of
//! them are transient, so nothing is retried internally.
//!
//! Divergence between the primary store and a secondary index is not an
//! error value. It indicates a defect in this crate and aborts through
//! [`consistency_violation`].

use crate::secondary_index::IndexKind;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Error type for multi-key collection operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Strict insert of a composite key that is already present
    #[error("Duplicate key: {message}")]
    DuplicateKey { message: String, operation: Option<String> },

    /// Exact lookup of a composite key or part value with no entry
    #[error("Key not found: {message}")]
    KeyNotFound { message: String, index: Option<IndexKind>, operation: Option<String> },

    /// Malformed or out-of-range input, rejected before any mutation
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String, argument: Option<String>, value: Option<String> },
}

impl CollectionError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CollectionError::DuplicateKey { .. } => "duplicate_key",
            CollectionError::KeyNotFound { .. } => "key_not_found",
            CollectionError::InvalidArgument { .. } => "invalid_argument",
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CollectionError::DuplicateKey { .. } => ErrorSeverity::Medium,
            CollectionError::KeyNotFound { .. } => ErrorSeverity::Low,
            CollectionError::InvalidArgument { .. } => ErrorSeverity::High,
        }
    }

    /// Check if the caller can carry on using the collection after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            CollectionError::DuplicateKey { .. } => true,
            CollectionError::KeyNotFound { .. } => true,
            CollectionError::InvalidArgument { .. } => false, // Input needs fixing
        }
    }

    /// The operation that failed, when known
    pub fn operation(&self) -> Option<&str> {
        match self {
            CollectionError::DuplicateKey { operation, .. }
            | CollectionError::KeyNotFound { operation, .. } => operation.as_deref(),
            CollectionError::InvalidArgument { .. } => None,
        }
    }
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
        }
    }
}

/// Result type alias for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Convenience constructors for common error scenarios
impl CollectionError {
    /// Create a duplicate key error for a strict insert
    pub fn duplicate_key(operation: &str) -> Self {
        Self::DuplicateKey {
            message: "an entry with the same composite key already exists".to_string(),
            operation: Some(operation.to_string()),
        }
    }

    /// Create a key not found error for an exact composite key lookup
    pub fn key_not_found(operation: &str) -> Self {
        Self::KeyNotFound {
            message: "no entry for the given composite key".to_string(),
            index: None,
            operation: Some(operation.to_string()),
        }
    }

    /// Create a key not found error for a lookup by a single key part
    pub fn part_not_found(index: IndexKind, operation: &str) -> Self {
        Self::KeyNotFound {
            message: format!("no entry has the given {index} part"),
            index: Some(index),
            operation: Some(operation.to_string()),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: &str, value: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            argument: Some(argument.to_string()),
            value: Some(value.to_string()),
        }
    }
}

impl From<toml::de::Error> for CollectionError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidArgument {
            message: format!("configuration could not be parsed: {err}"),
            argument: Some("config".to_string()),
            value: None,
        }
    }
}

/// Abort on divergence between the primary store and a secondary index.
///
/// Reaching this means an invariant of the collection was broken by this
/// crate, not by the caller, so there is nothing to recover.
#[cold]
#[track_caller]
pub(crate) fn consistency_violation(index: IndexKind, operation: &str, detail: &str) -> ! {
    error!(%index, operation, detail, "Secondary index diverged from primary store");
    panic!("index consistency violated in {operation} on {index} index: {detail}");
}
