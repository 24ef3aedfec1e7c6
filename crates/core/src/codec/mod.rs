//! Composite key codec
//!
//! Encodes an ordered sequence of [`Component`]s into one byte string whose
//! unsigned lexicographic order matches the component-wise, direction-aware
//! order of the inputs.
//!
//! # Format
//!
//! ```text
//! Key Layout:
//! ┌────────────────┬────────────────┬─────┬────────────────┐
//! │ Component 0    │ Component 1    │ ... │ Component n-1  │
//! └────────────────┴────────────────┴─────┴────────────────┘
//!
//! Component Layout:
//! ┌──────────────┬──────────────────────────┬─────────────────────┐
//! │ Tag (1 byte) │ Body (kind-specific)     │ End marker (1 byte) │
//! └──────────────┴──────────────────────────┴─────────────────────┘
//! ```
//!
//! The end marker is `0x00` for forward components and `0xFF` for reversed
//! ones. For reversed components every body byte is complemented as well.
//!
//! Bodies:
//! - text and bytes: value with `0x00` escaped as `0x00 0xFF`, then `0x00`
//! - integer: sign marker, then (non-zero only) a 2-byte big-endian magnitude
//!   length and the magnitude, both complemented for negatives
//! - long: 8 bytes big-endian with the sign bit flipped
//! - lexical UUID: 16 raw bytes
//! - time UUID: 16 bytes, timestamp fields most significant first
//! - UUID: version byte, then 16 bytes laid out as for time UUIDs if v1
//!
//! # Thread Safety
//!
//! `CompositeCodec` holds only immutable state; share it freely.

mod alphabet;
mod body;


pub use alphabet::TagAlphabet;

use crate::component::Component;
use crate::error::{KeyError, Result};
use crate::limits::KeyLimits;
use crate::tag::TypeTagRegistry;
use body::{read_body, write_body, Reader};
use std::cmp::Ordering;
use std::sync::Arc;

/// Upper bound byte for prefix scans; no tag code reaches it
const PREFIX_END: u8 = 0xFF;

/// Encoder/decoder for composite keys of one store
#[derive(Debug, Clone)]
pub struct CompositeCodec {
    registry: Arc<TypeTagRegistry>,
    alphabet: TagAlphabet,
    limits: KeyLimits,
}

impl CompositeCodec {
    /// Codec restricted to `alphabet`
    pub fn new(registry: Arc<TypeTagRegistry>, alphabet: TagAlphabet) -> Self {
        CompositeCodec {
            registry,
            alphabet,
            limits: KeyLimits::default(),
        }
    }

    /// Codec over the standard registry accepting every tag
    pub fn standard() -> Self {
        Self::new(TypeTagRegistry::standard(), TagAlphabet::all())
    }

    /// Replace the size limits
    pub fn with_limits(mut self, limits: KeyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Legal tags for this codec
    pub fn alphabet(&self) -> TagAlphabet {
        self.alphabet
    }

    /// Active size limits
    pub fn limits(&self) -> &KeyLimits {
        &self.limits
    }

    /// Tag registry used for decoding
    pub fn registry(&self) -> &Arc<TypeTagRegistry> {
        &self.registry
    }

    /// Encode components into a key
    ///
    /// # Errors
    ///
    /// - `IllegalTagForSchema` if a component's tag is outside the alphabet
    /// - `InvalidComponent` if a value violates its kind's invariants
    /// - `LimitExceeded` if a size limit is exceeded
    pub fn encode(&self, components: &[Component]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(components.len() * 12);
        self.encode_into(components, &mut out)?;
        Ok(out)
    }

    /// Encode components, appending to `out`
    ///
    /// On error `out` may hold a partial key.
    pub fn encode_into(&self, components: &[Component], out: &mut Vec<u8>) -> Result<()> {
        self.limits.check_count(components.len())?;
        let start = out.len();
        for component in components {
            let tag = component.tag();
            self.check_alphabet(tag.code())?;
            component.value().validate(&self.limits)?;

            let direction = tag.direction();
            out.push(tag.code());
            write_body(out, component.value(), direction.mask());
            out.push(direction.end_marker());
        }
        self.limits.check_key(out.len() - start)
    }

    /// Decode a key into its components
    ///
    /// # Errors
    ///
    /// - `UnknownTag` for a tag byte absent from the registry
    /// - `IllegalTagForSchema` for a registered tag outside the alphabet
    /// - `MalformedKey` for truncated or non-canonical bytes
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<Component>> {
        self.limits.check_key(bytes.len())?;
        let mut reader = Reader::new(bytes);
        let mut components = Vec::new();
        while !reader.is_empty() {
            if components.len() == self.limits.max_components {
                return Err(KeyError::LimitExceeded {
                    what: "component count",
                    actual: components.len() + 1,
                    max: self.limits.max_components,
                });
            }
            let code = reader.raw_byte("tag")?;
            let tag = self.registry.resolve(code)?;
            self.check_alphabet(code)?;

            let direction = tag.direction();
            reader.set_mask(direction.mask());
            let value = read_body(&mut reader, tag.kind())?;

            let marker_at = reader.pos();
            if reader.byte("end-of-component marker")? != 0x00 {
                return Err(KeyError::malformed(
                    marker_at,
                    format!(
                        "expected end-of-component marker {:#04x}",
                        direction.end_marker()
                    ),
                ));
            }
            reader.set_mask(0);
            components.push(Component::with_tag(tag, value)?);
        }
        Ok(components)
    }

    /// Byte range `[start, end)` covering every key that begins with `prefix`
    pub fn prefix_range(&self, prefix: &[Component]) -> Result<(Vec<u8>, Vec<u8>)> {
        let start = self.encode(prefix)?;
        let mut end = start.clone();
        end.push(PREFIX_END);
        Ok((start, end))
    }

    /// The comparison contract: unsigned lexicographic byte order
    pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn check_alphabet(&self, code: u8) -> Result<()> {
        if self.alphabet.contains_code(code) {
            return Ok(());
        }
        Err(KeyError::IllegalTagForSchema {
            tag: char::from(code),
            alphabet: self.alphabet.to_tag_string(),
        })
    }
}

impl Default for CompositeCodec {
    fn default() -> Self {
        Self::standard()
    }
}
