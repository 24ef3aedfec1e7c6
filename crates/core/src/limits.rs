//! Size limits for composite keys
//!
//! Limits are checked on encode, and the key length limit is also checked on
//! decode. Violations result in `KeyError::LimitExceeded`.
//!
//! ## Contract
//!
//! The defaults match the store's 64KiB column-name ceiling. A single text,
//! bytes or integer-magnitude component may never exceed `u16::MAX` bytes, whatever is configured.

use crate::error::{KeyError, Result};
use serde::{Deserialize, Serialize};

/// Hard ceiling on a single component's raw length
pub const MAX_COMPONENT_BYTES: usize = u16::MAX as usize;

/// Size limits applied by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyLimits {
    /// Maximum raw length of a variable-length component: text, bytes or
    /// integer magnitude (default: 65535)
    pub max_component_bytes: usize,

    /// Maximum components per key (default: 64)
    pub max_components: usize,

    /// Maximum encoded key length (default: 65535)
    pub max_key_bytes: usize,
}

impl Default for KeyLimits {
    fn default() -> Self {
        KeyLimits {
            max_component_bytes: MAX_COMPONENT_BYTES,
            max_components: 64,
            max_key_bytes: 65535,
        }
    }
}

impl KeyLimits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        KeyLimits {
            max_component_bytes: 16,
            max_components: 4,
            max_key_bytes: 64,
        }
    }

    /// Effective per-component limit, clamped to the format ceiling
    pub fn component_bytes(&self) -> usize {
        self.max_component_bytes.min(MAX_COMPONENT_BYTES)
    }

    pub(crate) fn check_component(&self, len: usize) -> Result<()> {
        let max = self.component_bytes();
        if len > max {
            return Err(KeyError::LimitExceeded {
                what: "component",
                actual: len,
                max,
            });
        }
        Ok(())
    }

    pub(crate) fn check_count(&self, count: usize) -> Result<()> {
        if count > self.max_components {
            return Err(KeyError::LimitExceeded {
                what: "component count",
                actual: count,
                max: self.max_components,
            });
        }
        Ok(())
    }

    pub(crate) fn check_key(&self, len: usize) -> Result<()> {
        if len > self.max_key_bytes {
            return Err(KeyError::LimitExceeded {
                what: "key",
                actual: len,
                max: self.max_key_bytes,
            });
        }
        Ok(())
    }
}
