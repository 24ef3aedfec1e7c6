//! Legal tag sets for a store

use crate::tag::{Direction, PrimitiveKind, TypeTag};
use std::fmt;

/// A set of tag codes, one bit per ASCII code
///
/// A store's composite comparator declares which tags its keys may carry.
/// This is how per-store ordering policy (for example "time UUIDs newest
/// first") is enforced without per-call configuration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagAlphabet {
    bits: u128,
}

impl TagAlphabet {
    /// The empty alphabet
    pub const fn empty() -> Self {
        TagAlphabet { bits: 0 }
    }

    /// Every canonical tag, both directions
    pub fn all() -> Self {
        PrimitiveKind::ALL
            .iter()
            .flat_map(|&k| Direction::ALL.map(|d| TypeTag::canonical(k, d)))
            .collect()
    }

    /// Add a tag
    pub fn with(mut self, tag: TypeTag) -> Self {
        self.insert(tag);
        self
    }

    /// Add a tag in place
    pub fn insert(&mut self, tag: TypeTag) {
        self.bits |= 1u128 << (tag.code() & 0x7F);
    }

    /// Membership by tag
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.contains_code(tag.code())
    }

    /// Membership by raw code
    pub fn contains_code(&self, code: u8) -> bool {
        code < 128 && self.bits & (1u128 << code) != 0
    }

    /// Codes in the alphabet, ascending
    pub fn codes(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..128).filter(move |&c| self.contains_code(c))
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// True if no tag is legal
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Tag characters as a string, in code order
    pub fn to_tag_string(&self) -> String {
        self.codes().map(char::from).collect()
    }
}

impl FromIterator<TypeTag> for TagAlphabet {
    fn from_iter<I: IntoIterator<Item = TypeTag>>(iter: I) -> Self {
        iter.into_iter().fold(TagAlphabet::empty(), TagAlphabet::with)
    }
}

impl fmt::Debug for TagAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagAlphabet({})", self.to_tag_string())
    }
}
