//! Error types for composite key handling
//!
//! Every failure the codec or tag registry can report is a variant of
//! [`KeyError`]. None of them are transient: they signal either corrupt or
//! version-skewed data (`UnknownTag`, `MalformedKey`) or a programmer error in
//! the calling layer (`IllegalTagForSchema`, `InvalidComponent`,
//! `LimitExceeded`). Nothing in this crate retries.

use crate::tag::PrimitiveKind;
use thiserror::Error;

/// Result type alias for key operations
pub type Result<T> = std::result::Result<T, KeyError>;

/// Errors raised while resolving tags or encoding/decoding composite keys
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Tag byte is not present in the tag registry
    #[error("Unknown type tag: {0:#04x}")]
    UnknownTag(u8),

    /// Encoded key bytes are truncated or internally inconsistent
    #[error("Malformed key at byte {offset}: {reason}")]
    MalformedKey {
        /// Byte offset where decoding failed
        offset: usize,
        /// What was wrong
        reason: String,
    },

    /// Tag is registered but not legal for the owning store
    #[error("Tag '{tag}' is not in the store alphabet [{alphabet}]")]
    IllegalTagForSchema {
        /// Offending tag character
        tag: char,
        /// The legal alphabet, as a string of tag characters
        alphabet: String,
    },

    /// Component value does not satisfy its kind's canonical form
    #[error("Invalid {kind} component: {reason}")]
    InvalidComponent {
        /// Kind the value was declared as
        kind: PrimitiveKind,
        /// What was wrong
        reason: String,
    },

    /// A configured size limit was exceeded
    #[error("{what} exceeds limit: {actual} > {max}")]
    LimitExceeded {
        /// Which limit was exceeded
        what: &'static str,
        /// Actual size
        actual: usize,
        /// Configured maximum
        max: usize,
    },
}

impl KeyError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        KeyError::MalformedKey {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(kind: PrimitiveKind, reason: impl Into<String>) -> Self {
        KeyError::InvalidComponent {
            kind,
            reason: reason.into(),
        }
    }

    /// Stable reason code for logs and callers that match on error class
    pub fn reason_code(&self) -> &'static str {
        match self {
            KeyError::UnknownTag(_) => "unknown_tag",
            KeyError::MalformedKey { .. } => "malformed_key",
            KeyError::IllegalTagForSchema { .. } => "illegal_tag_for_schema",
            KeyError::InvalidComponent { .. } => "invalid_component",
            KeyError::LimitExceeded { .. } => "limit_exceeded",
        }
    }

    /// True for errors that indicate bad stored bytes rather than a bad caller
    ///
    /// Scans over legacy rows may skip these instead of aborting.
    pub fn is_corruption(&self) -> bool {
        matches!(self, KeyError::UnknownTag(_) | KeyError::MalformedKey { .. })
    }
}
