//! Error types for schema handling
//!
//! Schema errors come in two flavours. Declaration errors (`InvalidComparator`,
//! `InvalidIndexSpec`, `DuplicateStore`, `Config`) surface while a registry is
//! being built and must abort startup. Lookup and write errors
//! (`UnknownStore`, `NotComposite`, `UnsupportedWrite`) are programmer errors
//! in the calling layer.

use colkey_core::KeyError;
use std::io;
use thiserror::Error;

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised by schema construction, lookup and guarded writes
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Lookup of a store name that is not registered
    #[error("Unknown store: {0}")]
    UnknownStore(String),

    /// Malformed secondary index declaration
    #[error("Invalid index spec '{spec}': {reason}")]
    InvalidIndexSpec {
        /// The declaration as written
        spec: String,
        /// What was wrong
        reason: String,
    },

    /// Malformed comparator or validator declaration
    #[error("Invalid comparator '{spec}': {reason}")]
    InvalidComparator {
        /// The declaration as written
        spec: String,
        /// What was wrong
        reason: String,
    },

    /// Two stores registered under one name
    #[error("Store registered twice: {0}")]
    DuplicateStore(String),

    /// Composite codec requested for a store with a simple comparator
    #[error("Store {0} does not use a composite comparator")]
    NotComposite(String),

    /// Write kind not allowed by the store (value write to a counter store or vice versa)
    #[error("Store {store} does not accept {operation} writes")]
    UnsupportedWrite {
        /// Store name
        store: String,
        /// Rejected operation
        operation: &'static str,
    },

    /// Configuration could not be parsed or validated
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error reading or writing configuration
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key encoding/decoding error
    #[error(transparent)]
    Key(#[from] KeyError),
}

impl SchemaError {
    pub(crate) fn index_spec(spec: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidIndexSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn comparator(spec: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidComparator {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable reason code for logs and callers that match on error class
    pub fn reason_code(&self) -> &'static str {
        match self {
            SchemaError::UnknownStore(_) => "unknown_store",
            SchemaError::InvalidIndexSpec { .. } => "invalid_index_spec",
            SchemaError::InvalidComparator { .. } => "invalid_comparator",
            SchemaError::DuplicateStore(_) => "duplicate_store",
            SchemaError::NotComposite(_) => "not_composite",
            SchemaError::UnsupportedWrite { .. } => "unsupported_write",
            SchemaError::Config(_) => "config",
            SchemaError::Io(_) => "io",
            SchemaError::Key(e) => e.reason_code(),
        }
    }

    /// True for errors that must abort schema initialization
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidIndexSpec { .. }
                | SchemaError::InvalidComparator { .. }
                | SchemaError::DuplicateStore(_)
                | SchemaError::Config(_)
        )
    }
}
