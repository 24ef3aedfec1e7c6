//! Per-kind component bodies
//!
//! Bodies are written in their forward form and XORed with the direction's
//! mask (`0x00` or `0xFF`) on the way out. The set of forward
//! `body ++ end_marker` strings of any one kind is prefix-free, which is what
//! makes complementing produce exact descending order.

use crate::error::{KeyError, Result};
use crate::uuid_time::{from_time_ordered_bytes, time_ordered_bytes};
use crate::value::{uuid_sort_key, ComponentValue};
use crate::tag::PrimitiveKind;
use byteorder::{BigEndian, ByteOrder};
use num_bigint::{BigInt, Sign};
use uuid::Uuid;

const ESCAPE: u8 = 0xFF;
const SEPARATOR: u8 = 0x00;

const INT_NEGATIVE: u8 = 0x00;
const INT_ZERO: u8 = 0x01;
const INT_POSITIVE: u8 = 0x02;

const LONG_SIGN_BIT: u64 = 1 << 63;

/// Append the masked body of `value` to `out`
pub(crate) fn write_body(out: &mut Vec<u8>, value: &ComponentValue, mask: u8) {
    let mut w = MaskedWriter { out, mask };
    match value {
        ComponentValue::Ascii(s) | ComponentValue::Utf8(s) => w.escaped(s.as_bytes()),
        ComponentValue::Bytes(b) => w.escaped(b),
        ComponentValue::Integer(n) => w.integer(n),
        ComponentValue::Long(v) => w.put(&((*v as u64) ^ LONG_SIGN_BIT).to_be_bytes()),
        ComponentValue::LexicalUuid(u) => w.put(u.as_bytes()),
        ComponentValue::TimeUuid(u) => w.put(&time_ordered_bytes(u)),
        ComponentValue::Uuid(u) => {
            let (version, bytes) = uuid_sort_key(u);
            w.put(&[version]);
            w.put(&bytes);
        }
    }
}

struct MaskedWriter<'a> {
    out: &'a mut Vec<u8>,
    mask: u8,
}

impl MaskedWriter<'_> {
    fn put(&mut self, bytes: &[u8]) {
        let mask = self.mask;
        self.out.extend(bytes.iter().map(|b| b ^ mask));
    }

    fn escaped(&mut self, bytes: &[u8]) {
        self.out.reserve(bytes.len() + 1);
        for &b in bytes {
            if b == SEPARATOR {
                self.put(&[SEPARATOR, ESCAPE]);
            } else {
                self.put(&[b]);
            }
        }
        self.put(&[SEPARATOR]);
    }

    fn integer(&mut self, n: &BigInt) {
        let (sign, magnitude) = n.to_bytes_be();
        match sign {
            Sign::NoSign => self.put(&[INT_ZERO]),
            Sign::Plus => {
                self.put(&[INT_POSITIVE]);
                self.put(&(magnitude.len() as u16).to_be_bytes());
                self.put(&magnitude);
            }
            Sign::Minus => {
                // Larger magnitudes must sort lower, so length and digits are complemented.
                self.put(&[INT_NEGATIVE]);
                let len = !(magnitude.len() as u16);
                self.put(&len.to_be_bytes());
                let flipped: Vec<u8> = magnitude.iter().map(|b| !b).collect();
                self.put(&flipped);
            }
        }
    }
}

/// Cursor over a whole key that unmasks bytes as it reads
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    mask: u8,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Reader {
            bytes,
            pos: 0,
            mask: 0,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub(crate) fn set_mask(&mut self, mask: u8) {
        self.mask = mask;
    }

    /// Read one raw byte, ignoring the mask
    pub(crate) fn raw_byte(&mut self, what: &str) -> Result<u8> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| KeyError::malformed(self.pos, format!("truncated {what}")))?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn byte(&mut self, what: &str) -> Result<u8> {
        Ok(self.raw_byte(what)? ^ self.mask)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).map(|b| b ^ self.mask)
    }

    fn take(&mut self, n: usize, what: &str) -> Result<Vec<u8>> {
        if self.remaining() < n {
            return Err(KeyError::malformed(
                self.pos,
                format!("truncated {what}: need {n} bytes, have {}", self.remaining()),
            ));
        }
        let mask = self.mask;
        let out = self.bytes[self.pos..self.pos + n]
            .iter()
            .map(|b| b ^ mask)
            .collect();
        self.pos += n;
        Ok(out)
    }

    fn take_16(&mut self, what: &str) -> Result<[u8; 16]> {
        let v = self.take(16, what)?;
        let mut out = [0u8; 16];
        out.copy_from_slice(&v);
        Ok(out)
    }

    fn escaped(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let b = self.byte("text component")?;
            if b != SEPARATOR {
                out.push(b);
                continue;
            }
            if self.peek() == Some(ESCAPE) {
                self.pos += 1;
                out.push(SEPARATOR);
            } else {
                return Ok(out);
            }
        }
    }
}

/// Read the body of a component of `kind`; the reader's mask must already be set
pub(crate) fn read_body(r: &mut Reader<'_>, kind: PrimitiveKind) -> Result<ComponentValue> {
    let start = r.pos();
    match kind {
        PrimitiveKind::Ascii => {
            let raw = r.escaped()?;
            if !raw.is_ascii() {
                return Err(KeyError::malformed(start, "non-ASCII byte in ascii component"));
            }
            let s = String::from_utf8(raw).map_err(|e| KeyError::malformed(start, e.to_string()))?;
            Ok(ComponentValue::Ascii(s))
        }
        PrimitiveKind::Utf8 => {
            let raw = r.escaped()?;
            let s = String::from_utf8(raw)
                .map_err(|e| KeyError::malformed(start, format!("invalid UTF-8: {e}")))?;
            Ok(ComponentValue::Utf8(s))
        }
        PrimitiveKind::Bytes => Ok(ComponentValue::Bytes(r.escaped()?)),
        PrimitiveKind::Integer => read_integer(r),
        PrimitiveKind::Long => {
            let raw = r.take(8, "long component")?;
            let v = BigEndian::read_u64(&raw) ^ LONG_SIGN_BIT;
            Ok(ComponentValue::Long(v as i64))
        }
        PrimitiveKind::LexicalUuid => Ok(ComponentValue::LexicalUuid(Uuid::from_bytes(
            r.take_16("lexical uuid component")?,
        ))),
        PrimitiveKind::TimeUuid => {
            let uuid = from_time_ordered_bytes(&r.take_16("time uuid component")?);
            if uuid.get_version_num() != 1 {
                return Err(KeyError::malformed(start, "time uuid component is not version 1"));
            }
            Ok(ComponentValue::TimeUuid(uuid))
        }
        PrimitiveKind::Uuid => {
            let version = r.byte("uuid version")?;
            let body = r.take_16("uuid component")?;
            let uuid = if version == 1 {
                from_time_ordered_bytes(&body)
            } else {
                Uuid::from_bytes(body)
            };
            if uuid.get_version_num() as u8 != version {
                return Err(KeyError::malformed(start, "uuid version byte does not match uuid"));
            }
            Ok(ComponentValue::Uuid(uuid))
        }
    }
}

fn read_integer(r: &mut Reader<'_>) -> Result<ComponentValue> {
    let start = r.pos();
    let marker = r.byte("integer sign")?;
    let sign = match marker {
        INT_ZERO => return Ok(ComponentValue::Integer(BigInt::from(0))),
        INT_POSITIVE => Sign::Plus,
        INT_NEGATIVE => Sign::Minus,
        other => {
            return Err(KeyError::malformed(
                start,
                format!("invalid integer sign marker {other:#04x}"),
            ))
        }
    };

    let prefix_at = r.pos();
    if r.remaining() < 2 {
        return Err(KeyError::malformed(prefix_at, "truncated length prefix"));
    }
    let mut len_bytes = [r.byte("length prefix")?, r.byte("length prefix")?];
    let mut magnitude_mask = 0u8;
    if sign == Sign::Minus {
        len_bytes = [!len_bytes[0], !len_bytes[1]];
        magnitude_mask = 0xFF;
    }
    let len = u16::from_be_bytes(len_bytes) as usize;
    if len > r.remaining() {
        return Err(KeyError::malformed(
            prefix_at,
            format!(
                "length prefix {len} exceeds remaining {} bytes",
                r.remaining()
            ),
        ));
    }

    let magnitude: Vec<u8> = r
        .take(len, "integer magnitude")?
        .into_iter()
        .map(|b| b ^ magnitude_mask)
        .collect();
    if magnitude.first().map_or(true, |&b| b == 0) {
        return Err(KeyError::malformed(prefix_at, "non-canonical integer magnitude"));
    }
    Ok(ComponentValue::Integer(BigInt::from_bytes_be(sign, &magnitude)))
}
