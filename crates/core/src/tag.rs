//! Type tags for composite key components
//!
//! Every component of a composite key starts with a one-byte tag. The tag
//! names the component's primitive kind and its sort direction. Forward tags
//! are lower-case ASCII letters, the reversed variant of each is the matching
//! upper-case letter.
//!
//! ## Tag Values
//!
//! These values are part of the on-disk format and MUST NOT change:
//!
//! | Kind          | Forward | Reversed |
//! |---------------|---------|----------|
//! | Ascii         | `a`     | `A`      |
//! | Bytes         | `b`     | `B`      |
//! | Integer       | `i`     | `I`      |
//! | LexicalUuid   | `x`     | `X`      |
//! | Long          | `l`     | `L`      |
//! | TimeUuid      | `t`     | `T`      |
//! | Utf8          | `s`     | `S`      |
//! | Uuid          | `u`     | `U`      |

use crate::error::{KeyError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Primitive value kinds a component can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// 7-bit ASCII text
    Ascii,
    /// Arbitrary bytes
    Bytes,
    /// Arbitrary-precision signed integer
    Integer,
    /// UUID compared byte-wise
    LexicalUuid,
    /// 64-bit signed integer
    Long,
    /// Version-1 UUID compared by timestamp
    TimeUuid,
    /// UTF-8 text
    Utf8,
    /// UUID of any version
    Uuid,
}

impl PrimitiveKind {
    /// All kinds, in alias-table order
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Ascii,
        PrimitiveKind::Bytes,
        PrimitiveKind::Integer,
        PrimitiveKind::LexicalUuid,
        PrimitiveKind::Long,
        PrimitiveKind::TimeUuid,
        PrimitiveKind::Utf8,
        PrimitiveKind::Uuid,
    ];

    /// Forward alias character
    pub const fn alias(&self) -> char {
        match self {
            PrimitiveKind::Ascii => 'a',
            PrimitiveKind::Bytes => 'b',
            PrimitiveKind::Integer => 'i',
            PrimitiveKind::LexicalUuid => 'x',
            PrimitiveKind::Long => 'l',
            PrimitiveKind::TimeUuid => 't',
            PrimitiveKind::Utf8 => 's',
            PrimitiveKind::Uuid => 'u',
        }
    }

    /// Marshal type name used in comparator specifications
    pub const fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Ascii => "AsciiType",
            PrimitiveKind::Bytes => "BytesType",
            PrimitiveKind::Integer => "IntegerType",
            PrimitiveKind::LexicalUuid => "LexicalUUIDType",
            PrimitiveKind::Long => "LongType",
            PrimitiveKind::TimeUuid => "TimeUUIDType",
            PrimitiveKind::Utf8 => "UTF8Type",
            PrimitiveKind::Uuid => "UUIDType",
        }
    }

    /// Parse from a marshal type name (without package prefix or parameters)
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.type_name() == name)
    }

    /// Short lowercase identifier
    pub const fn id(&self) -> &'static str {
        match self {
            PrimitiveKind::Ascii => "ascii",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::LexicalUuid => "lexical_uuid",
            PrimitiveKind::Long => "long",
            PrimitiveKind::TimeUuid => "time_uuid",
            PrimitiveKind::Utf8 => "utf8",
            PrimitiveKind::Uuid => "uuid",
        }
    }

    /// Width of the encoded body when it does not depend on the value
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            PrimitiveKind::Long => Some(8),
            PrimitiveKind::LexicalUuid | PrimitiveKind::TimeUuid => Some(16),
            PrimitiveKind::Uuid => Some(17),
            PrimitiveKind::Ascii
            | PrimitiveKind::Bytes
            | PrimitiveKind::Integer
            | PrimitiveKind::Utf8 => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Sort direction of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Natural order
    Forward,
    /// Descending order
    Reversed,
}

impl Direction {
    /// Both directions
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reversed];

    /// End-of-component marker written after the body
    pub const fn end_marker(&self) -> u8 {
        match self {
            Direction::Forward => 0x00,
            Direction::Reversed => 0xFF,
        }
    }

    /// XOR mask applied to every body byte
    pub(crate) const fn mask(&self) -> u8 {
        self.end_marker()
    }

    /// True for [`Direction::Reversed`]
    pub const fn is_reversed(&self) -> bool {
        matches!(self, Direction::Reversed)
    }
}

/// An immutable (code, kind, direction) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    code: u8,
    kind: PrimitiveKind,
    direction: Direction,
}

impl TypeTag {
    /// The canonical tag for a kind and direction
    pub const fn canonical(kind: PrimitiveKind, direction: Direction) -> Self {
        let forward = kind.alias() as u8;
        let code = match direction {
            Direction::Forward => forward,
            Direction::Reversed => forward.to_ascii_uppercase(),
        };
        TypeTag {
            code,
            kind,
            direction,
        }
    }

    /// Tag byte as written into keys
    pub const fn code(&self) -> u8 {
        self.code
    }

    /// Tag as a character
    pub const fn as_char(&self) -> char {
        self.code as char
    }

    /// Primitive kind
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Sort direction
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The same kind in the opposite direction
    pub const fn flipped(&self) -> Self {
        match self.direction {
            Direction::Forward => TypeTag::canonical(self.kind, Direction::Reversed),
            Direction::Reversed => TypeTag::canonical(self.kind, Direction::Forward),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

static STANDARD: Lazy<Arc<TypeTagRegistry>> = Lazy::new(|| Arc::new(TypeTagRegistry::new()));

/// Lookup table from tag byte to [`TypeTag`]
///
/// Built once, never mutated. Tags are ASCII so the table is indexed directly
/// by code.
#[derive(Clone, PartialEq, Eq)]
pub struct TypeTagRegistry {
    by_code: [Option<TypeTag>; 128],
}

impl TypeTagRegistry {
    /// Build a registry holding every canonical tag
    pub fn new() -> Self {
        let mut by_code = [None; 128];
        for kind in PrimitiveKind::ALL {
            for direction in Direction::ALL {
                let tag = TypeTag::canonical(kind, direction);
                by_code[tag.code() as usize] = Some(tag);
            }
        }
        TypeTagRegistry { by_code }
    }

    /// Process-wide shared registry
    pub fn standard() -> Arc<TypeTagRegistry> {
        Arc::clone(&STANDARD)
    }

    /// Resolve a tag byte
    pub fn resolve(&self, code: u8) -> Result<TypeTag> {
        self.by_code
            .get(code as usize)
            .copied()
            .flatten()
            .ok_or(KeyError::UnknownTag(code))
    }

    /// Resolve a tag character
    pub fn resolve_char(&self, c: char) -> Result<TypeTag> {
        if !c.is_ascii() {
            // Non-ASCII chars cannot be tags; report the low byte of the UTF-8 form.
            let mut buf = [0u8; 4];
            return Err(KeyError::UnknownTag(c.encode_utf8(&mut buf).as_bytes()[0]));
        }
        self.resolve(c as u8)
    }

    /// Tag for a kind and direction
    pub fn tag_for(&self, kind: PrimitiveKind, direction: Direction) -> TypeTag {
        TypeTag::canonical(kind, direction)
    }

    /// Iterate all registered tags in code order
    pub fn iter(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.by_code.iter().filter_map(|t| *t)
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false for a built registry
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeTagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeTagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: String = self.iter().map(|t| t.as_char()).collect();
        f.debug_struct("TypeTagRegistry").field("tags", &tags).finish()
    }
}
