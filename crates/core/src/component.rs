//! A single tagged component of a composite key

use crate::error::{KeyError, Result};
use crate::tag::{Direction, TypeTag};
use crate::value::ComponentValue;
use std::cmp::Ordering;

/// A (tag, value) pair
///
/// The tag's kind always matches the value's kind; constructors enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    tag: TypeTag,
    value: ComponentValue,
}

impl Component {
    /// Component with the canonical tag for the value's kind and `direction`
    pub fn new(value: impl Into<ComponentValue>, direction: Direction) -> Self {
        let value = value.into();
        Component {
            tag: TypeTag::canonical(value.kind(), direction),
            value,
        }
    }

    /// Forward (ascending) component
    pub fn forward(value: impl Into<ComponentValue>) -> Self {
        Self::new(value, Direction::Forward)
    }

    /// Reversed (descending) component
    pub fn reversed(value: impl Into<ComponentValue>) -> Self {
        Self::new(value, Direction::Reversed)
    }

    /// Pair an explicit tag with a value, checking that the kinds agree
    pub fn with_tag(tag: TypeTag, value: ComponentValue) -> Result<Self> {
        if tag.kind() != value.kind() {
            return Err(KeyError::invalid(
                tag.kind(),
                format!("tag '{}' cannot carry a {} value", tag, value.kind()),
            ));
        }
        Ok(Component { tag, value })
    }

    /// The component's tag
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// The component's value
    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    /// Sort direction
    pub fn direction(&self) -> Direction {
        self.tag.direction()
    }

    /// Consume into the value
    pub fn into_value(self) -> ComponentValue {
        self.value
    }

    /// Direction-aware comparison of two components with the same tag
    ///
    /// Returns `None` when the tags differ.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if self.tag != other.tag {
            return None;
        }
        let ord = self.value.natural_cmp(&other.value)?;
        Some(match self.direction() {
            Direction::Forward => ord,
            Direction::Reversed => ord.reverse(),
        })
    }
}

/// Component-wise, direction-aware comparison of two component sequences
///
/// A sequence that is a strict prefix of the other sorts first. Returns `None`
/// when the tags at some compared position differ.
pub fn compare_components(a: &[Component], b: &[Component]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        match x.compare(y)? {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(a.len().cmp(&b.len()))
}
