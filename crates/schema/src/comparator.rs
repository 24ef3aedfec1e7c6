//! Comparator and validator declarations
//!
//! Stores declare their column ordering with the store's marshal type names:
//!
//! ```text
//! BytesType
//! LongType(reversed=true)
//! org.apache.cassandra.db.marshal.UUIDType
//! DynamicCompositeType(a=>AsciiType,s=>UTF8Type,T=>TimeUUIDType(reversed=true))
//! ```
//!
//! A `DynamicCompositeType` alias list doubles as the store's legal tag
//! alphabet. Aliases are not free-form: each alias character must be bound
//! to the same kind and direction the tag registry gives it.

use crate::error::{Result, SchemaError};
use colkey_core::{Direction, PrimitiveKind, TagAlphabet, TypeTag, TypeTagRegistry};
use std::fmt;

/// Package prefix accepted (and ignored) in front of type names
pub const MARSHAL_PACKAGE: &str = "org.apache.cassandra.db.marshal.";

/// Type name of the counter value validator
pub const COUNTER_TYPE: &str = "CounterColumnType";

/// Type name of the composite comparator
pub const DYNAMIC_COMPOSITE_TYPE: &str = "DynamicCompositeType";

/// The full alias table, as declared by the composite application stores
pub const DEFAULT_DYNAMIC_COMPOSITE_ALIASES: &str =
    "(a=>AsciiType,b=>BytesType,i=>IntegerType,x=>LexicalUUIDType,l=>LongType,t=>TimeUUIDType,s=>UTF8Type,\
     u=>UUIDType,A=>AsciiType(reversed=true),B=>BytesType(reversed=true),\
     I=>IntegerType(reversed=true),X=>LexicalUUIDType(reversed=true),L=>LongType(reversed=true),\
     T=>TimeUUIDType(reversed=true),S=>UTF8Type(reversed=true),U=>UUIDType(reversed=true))";

/// Column (or row key) ordering of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// A single primitive type, optionally reversed
    Simple(TypeTag),
    /// Dynamic composite keys restricted to an alphabet
    Composite(TagAlphabet),
}

impl Comparator {
    /// Parse against the standard tag registry
    pub fn parse(spec: &str) -> Result<Self> {
        Self::parse_with(spec, &TypeTagRegistry::standard())
    }

    /// Parse against an explicit tag registry
    pub fn parse_with(spec: &str, registry: &TypeTagRegistry) -> Result<Self> {
        let trimmed = strip_package(spec.trim());
        if let Some(rest) = trimmed.strip_prefix(DYNAMIC_COMPOSITE_TYPE) {
            return parse_aliases(spec, rest, registry).map(Comparator::Composite);
        }
        parse_simple(spec, trimmed).map(Comparator::Simple)
    }

    /// True for dynamic composite comparators
    pub fn is_composite(&self) -> bool {
        matches!(self, Comparator::Composite(_))
    }

    /// Legal tag alphabet of a composite comparator
    pub fn alphabet(&self) -> Option<TagAlphabet> {
        match self {
            Comparator::Composite(alphabet) => Some(*alphabet),
            Comparator::Simple(_) => None,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Simple(tag) => f.write_str(&type_spec(*tag)),
            Comparator::Composite(alphabet) => {
                let aliases: Vec<String> = Direction::ALL
                    .iter()
                    .flat_map(|&d| PrimitiveKind::ALL.map(|k| TypeTag::canonical(k, d)))
                    .filter(|t| alphabet.contains(*t))
                    .map(|t| format!("{}=>{}", t.as_char(), type_spec(t)))
                    .collect();
                write!(f, "{}({})", DYNAMIC_COMPOSITE_TYPE, aliases.join(","))
            }
        }
    }
}

/// Value validation of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueValidator {
    /// Values must be valid raw forms of this kind
    Typed(PrimitiveKind),
    /// Values are mergeable counters; only increments are accepted
    Counter,
}

impl ValueValidator {
    /// Parse a validator type name
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = strip_package(spec.trim());
        if trimmed == COUNTER_TYPE {
            return Ok(ValueValidator::Counter);
        }
        match parse_simple(spec, trimmed)? {
            tag if tag.direction().is_reversed() => Err(SchemaError::comparator(
                spec,
                "validators cannot be reversed",
            )),
            tag => Ok(ValueValidator::Typed(tag.kind())),
        }
    }

    /// True for counter validators
    pub fn is_counter(&self) -> bool {
        matches!(self, ValueValidator::Counter)
    }
}

impl fmt::Display for ValueValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueValidator::Typed(kind) => f.write_str(kind.type_name()),
            ValueValidator::Counter => f.write_str(COUNTER_TYPE),
        }
    }
}

fn strip_package(s: &str) -> &str {
    s.strip_prefix(MARSHAL_PACKAGE).unwrap_or(s)
}

fn type_spec(tag: TypeTag) -> String {
    match tag.direction() {
        Direction::Forward => tag.kind().type_name().to_string(),
        Direction::Reversed => format!("{}(reversed=true)", tag.kind().type_name()),
    }
}

/// Parse `Name` or `Name(reversed=bool)`
pub(crate) fn parse_simple(spec: &str, s: &str) -> Result<TypeTag> {
    let s = strip_package(s.trim());
    let (name, direction) = match s.find('(') {
        None => (s, Direction::Forward),
        Some(open) => {
            let params = s[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| SchemaError::comparator(spec, "unbalanced parentheses"))?;
            let direction = match params.replace(' ', "").as_str() {
                "reversed=true" => Direction::Reversed,
                "reversed=false" | "" => Direction::Forward,
                other => {
                    return Err(SchemaError::comparator(
                        spec,
                        format!("unsupported type parameter '{other}'"),
                    ))
                }
            };
            (s[..open].trim(), direction)
        }
    };
    let kind = PrimitiveKind::from_type_name(name)
        .ok_or_else(|| SchemaError::comparator(spec, format!("unknown type '{name}'")))?;
    Ok(TypeTag::canonical(kind, direction))
}

fn parse_aliases(spec: &str, rest: &str, registry: &TypeTagRegistry) -> Result<TagAlphabet> {
    let body = rest
        .trim()
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| SchemaError::comparator(spec, "expected an alias list in parentheses"))?;

    let mut alphabet = TagAlphabet::empty();
    for entry in body.split(',').map(str::trim) {
        let (alias, type_part) = entry
            .split_once("=>")
            .ok_or_else(|| SchemaError::comparator(spec, format!("alias entry '{entry}' lacks '=>'")))?;

        let mut chars = alias.trim().chars();
        let alias_char = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(SchemaError::comparator(
                    spec,
                    format!("alias '{alias}' must be one character"),
                ))
            }
        };

        let bound = registry.resolve_char(alias_char).map_err(|_| {
            SchemaError::comparator(spec, format!("alias '{alias_char}' is not a registered tag"))
        })?;
        let declared = parse_simple(spec, type_part)?;
        if declared != bound {
            return Err(SchemaError::comparator(
                spec,
                format!(
                    "alias '{alias_char}' declared as {} but the registry binds it to {}",
                    type_spec(declared),
                    type_spec(bound)
                ),
            ));
        }
        if alphabet.contains(bound) {
            return Err(SchemaError::comparator(
                spec,
                format!("alias '{alias_char}' declared twice"),
            ));
        }
        alphabet.insert(bound);
    }
    Ok(alphabet)
}
