//! Component values
//!
//! [`ComponentValue`] is the typed payload of one composite key component.
//! Each variant corresponds to exactly one [`PrimitiveKind`], and each kind
//! has a canonical raw byte form (see [`ComponentValue::to_raw`]):
//!
//! | Kind        | Raw form                                      |
//! |-------------|-----------------------------------------------|
//! | Ascii       | the ASCII bytes                               |
//! | Bytes       | the bytes                                     |
//! | Integer     | minimal two's complement, big-endian          |
//! | LexicalUuid | 16 bytes                                      |
//! | Long        | 8 bytes, big-endian                           |
//! | TimeUuid    | 16 bytes, version 1                           |
//! | Utf8        | the UTF-8 bytes                               |
//! | Uuid        | 16 bytes                                      |

use crate::error::{KeyError, Result};
use crate::limits::KeyLimits;
use crate::tag::PrimitiveKind;
use crate::uuid_time::{is_time_uuid, time_ordered_bytes};
use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigInt;
use std::cmp::Ordering;
use uuid::Uuid;

/// Typed value of a composite key component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentValue {
    /// 7-bit ASCII text
    Ascii(String),
    /// Arbitrary bytes
    Bytes(Vec<u8>),
    /// Arbitrary-precision signed integer
    Integer(BigInt),
    /// UUID compared byte-wise
    LexicalUuid(Uuid),
    /// 64-bit signed integer
    Long(i64),
    /// Version-1 UUID compared by timestamp
    TimeUuid(Uuid),
    /// UTF-8 text
    Utf8(String),
    /// UUID of any version
    Uuid(Uuid),
}

impl ComponentValue {
    /// ASCII text, rejecting non-ASCII input
    pub fn ascii(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if !s.is_ascii() {
            return Err(KeyError::invalid(PrimitiveKind::Ascii, "non-ASCII character"));
        }
        Ok(ComponentValue::Ascii(s))
    }

    /// UTF-8 text
    pub fn utf8(s: impl Into<String>) -> Self {
        ComponentValue::Utf8(s.into())
    }

    /// Arbitrary-precision integer
    pub fn integer(n: impl Into<BigInt>) -> Self {
        ComponentValue::Integer(n.into())
    }

    /// Time-ordered UUID, rejecting anything but version 1
    pub fn time_uuid(uuid: Uuid) -> Result<Self> {
        if !is_time_uuid(&uuid) {
            return Err(KeyError::invalid(
                PrimitiveKind::TimeUuid,
                format!("expected version 1, got version {}", uuid.get_version_num()),
            ));
        }
        Ok(ComponentValue::TimeUuid(uuid))
    }

    /// Kind of this value
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            ComponentValue::Ascii(_) => PrimitiveKind::Ascii,
            ComponentValue::Bytes(_) => PrimitiveKind::Bytes,
            ComponentValue::Integer(_) => PrimitiveKind::Integer,
            ComponentValue::LexicalUuid(_) => PrimitiveKind::LexicalUuid,
            ComponentValue::Long(_) => PrimitiveKind::Long,
            ComponentValue::TimeUuid(_) => PrimitiveKind::TimeUuid,
            ComponentValue::Utf8(_) => PrimitiveKind::Utf8,
            ComponentValue::Uuid(_) => PrimitiveKind::Uuid,
        }
    }

    /// Compare two values of the same kind in their natural order
    ///
    /// Returns `None` when the kinds differ.
    pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (ComponentValue::Ascii(a), ComponentValue::Ascii(b))
            | (ComponentValue::Utf8(a), ComponentValue::Utf8(b)) => {
                Some(a.as_bytes().cmp(b.as_bytes()))
            }
            (ComponentValue::Bytes(a), ComponentValue::Bytes(b)) => Some(a.cmp(b)),
            (ComponentValue::Integer(a), ComponentValue::Integer(b)) => Some(a.cmp(b)),
            (ComponentValue::Long(a), ComponentValue::Long(b)) => Some(a.cmp(b)),
            (ComponentValue::LexicalUuid(a), ComponentValue::LexicalUuid(b)) => {
                Some(a.as_bytes().cmp(b.as_bytes()))
            }
            (ComponentValue::TimeUuid(a), ComponentValue::TimeUuid(b)) => {
                Some(time_ordered_bytes(a).cmp(&time_ordered_bytes(b)))
            }
            (ComponentValue::Uuid(a), ComponentValue::Uuid(b)) => {
                Some(uuid_sort_key(a).cmp(&uuid_sort_key(b)))
            }
            _ => None,
        }
    }

    /// Check the value against its kind's invariants and the given limits
    pub fn validate(&self, limits: &KeyLimits) -> Result<()> {
        match self {
            ComponentValue::Ascii(s) => {
                if !s.is_ascii() {
                    return Err(KeyError::invalid(PrimitiveKind::Ascii, "non-ASCII character"));
                }
                limits.check_component(s.len())
            }
            ComponentValue::Utf8(s) => limits.check_component(s.len()),
            ComponentValue::Bytes(b) => limits.check_component(b.len()),
            ComponentValue::Integer(n) => {
                let (_, magnitude) = n.to_bytes_be();
                limits.check_component(magnitude.len())
            }
            ComponentValue::TimeUuid(u) => {
                if !is_time_uuid(u) {
                    return Err(KeyError::invalid(
                        PrimitiveKind::TimeUuid,
                        format!("expected version 1, got version {}", u.get_version_num()),
                    ));
                }
                Ok(())
            }
            ComponentValue::Long(_) | ComponentValue::LexicalUuid(_) | ComponentValue::Uuid(_) => {
                Ok(())
            }
        }
    }

    /// Canonical raw byte form
    pub fn to_raw(&self) -> Vec<u8> {
        match self {
            ComponentValue::Ascii(s) | ComponentValue::Utf8(s) => s.as_bytes().to_vec(),
            ComponentValue::Bytes(b) => b.clone(),
            ComponentValue::Integer(n) => n.to_signed_bytes_be(),
            ComponentValue::Long(v) => v.to_be_bytes().to_vec(),
            ComponentValue::LexicalUuid(u) | ComponentValue::TimeUuid(u) | ComponentValue::Uuid(u) => {
                u.as_bytes().to_vec()
            }
        }
    }

    /// Parse a value from its kind's canonical raw byte form
    pub fn from_raw(kind: PrimitiveKind, raw: &[u8]) -> Result<Self> {
        match kind {
            PrimitiveKind::Ascii => {
                if !raw.is_ascii() {
                    return Err(KeyError::invalid(kind, "non-ASCII byte"));
                }
                let s = String::from_utf8(raw.to_vec())
                    .map_err(|e| KeyError::invalid(kind, e.to_string()))?;
                Ok(ComponentValue::Ascii(s))
            }
            PrimitiveKind::Bytes => Ok(ComponentValue::Bytes(raw.to_vec())),
            PrimitiveKind::Integer => {
                if raw.is_empty() {
                    return Err(KeyError::invalid(kind, "empty integer"));
                }
                let n = BigInt::from_signed_bytes_be(raw);
                if n.to_signed_bytes_be() != raw {
                    return Err(KeyError::invalid(kind, "non-minimal two's complement form"));
                }
                Ok(ComponentValue::Integer(n))
            }
            PrimitiveKind::Long => {
                if raw.len() != 8 {
                    return Err(KeyError::invalid(
                        kind,
                        format!("expected 8 bytes, got {}", raw.len()),
                    ));
                }
                Ok(ComponentValue::Long(BigEndian::read_i64(raw)))
            }
            PrimitiveKind::LexicalUuid | PrimitiveKind::TimeUuid | PrimitiveKind::Uuid => {
                let bytes: [u8; 16] = raw.try_into().map_err(|_| {
                    KeyError::invalid(kind, format!("expected 16 bytes, got {}", raw.len()))
                })?;
                let uuid = Uuid::from_bytes(bytes);
                match kind {
                    PrimitiveKind::LexicalUuid => Ok(ComponentValue::LexicalUuid(uuid)),
                    PrimitiveKind::TimeUuid => ComponentValue::time_uuid(uuid),
                    _ => Ok(ComponentValue::Uuid(uuid)),
                }
            }
            PrimitiveKind::Utf8 => {
                let s = String::from_utf8(raw.to_vec())
                    .map_err(|e| KeyError::invalid(kind, e.to_string()))?;
                Ok(ComponentValue::Utf8(s))
            }
        }
    }
}

/// Sort key of a generic UUID: version first, then time order for v1
pub(crate) fn uuid_sort_key(uuid: &Uuid) -> (u8, [u8; 16]) {
    let version = uuid.get_version_num() as u8;
    if version == 1 {
        (version, time_ordered_bytes(uuid))
    } else {
        (version, *uuid.as_bytes())
    }
}

impl From<&str> for ComponentValue {
    fn from(s: &str) -> Self {
        ComponentValue::Utf8(s.to_string())
    }
}

impl From<String> for ComponentValue {
    fn from(s: String) -> Self {
        ComponentValue::Utf8(s)
    }
}

impl From<i64> for ComponentValue {
    fn from(v: i64) -> Self {
        ComponentValue::Long(v)
    }
}

impl From<Vec<u8>> for ComponentValue {
    fn from(b: Vec<u8>) -> Self {
        ComponentValue::Bytes(b)
    }
}

impl From<&[u8]> for ComponentValue {
    fn from(b: &[u8]) -> Self {
        ComponentValue::Bytes(b.to_vec())
    }
}

impl From<BigInt> for ComponentValue {
    fn from(n: BigInt) -> Self {
        ComponentValue::Integer(n)
    }
}

impl From<Uuid> for ComponentValue {
    fn from(u: Uuid) -> Self {
        ComponentValue::Uuid(u)
    }
}
