//! Secondary index declarations
//!
//! A store may declare secondary indexes on named columns with a compact
//! spec string:
//!
//! ```text
//! owner                       -> index "owner", values validated as UUIDType
//! owner,email:UTF8Type        -> two indexes
//! ```
//!
//! Parsing happens while the schema registry is built. A malformed spec is a
//! startup failure, never a deferred one.

use crate::comparator::parse_simple;
use crate::error::{Result, SchemaError};
use colkey_core::PrimitiveKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation type used when an entry names no type
pub const DEFAULT_INDEX_VALIDATION: PrimitiveKind = PrimitiveKind::Uuid;

/// Kind of secondary index the store maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    /// Hash index on the column value
    Keys,
}

/// Column definition for one secondary index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexColumnSpec {
    /// Indexed column name
    pub column_name: String,
    /// Validation type of the column's values
    pub validation_class: PrimitiveKind,
    /// Index name (same as the column name)
    pub index_name: String,
    /// Index type
    pub index_type: IndexType,
}

/// Parser for index spec strings
pub struct IndexMetadataBuilder;

impl IndexMetadataBuilder {
    /// Parse an optional index spec into column definitions
    ///
    /// `None`, an empty string, or whitespace yields no indexes.
    pub fn parse(spec: Option<&str>) -> Result<Vec<IndexColumnSpec>> {
        let spec = match spec.map(str::trim) {
            None | Some("") => return Ok(Vec::new()),
            Some(s) => s,
        };

        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for entry in spec.split(',').map(str::trim) {
            if entry.is_empty() {
                return Err(SchemaError::index_spec(spec, "empty index entry"));
            }
            let (name, type_part) = match entry.split_once(':') {
                Some((name, ty)) => (name.trim(), Some(ty.trim())),
                None => (entry, None),
            };
            validate_column_name(spec, name)?;

            let validation_class = match type_part {
                None => DEFAULT_INDEX_VALIDATION,
                Some("") => {
                    return Err(SchemaError::index_spec(
                        spec,
                        format!("column '{name}' has an empty validation type"),
                    ))
                }
                Some(ty) => parse_validation(spec, ty)?,
            };

            if !seen.insert(name.to_string()) {
                return Err(SchemaError::index_spec(
                    spec,
                    format!("column '{name}' indexed twice"),
                ));
            }
            columns.push(IndexColumnSpec {
                column_name: name.to_string(),
                validation_class,
                index_name: name.to_string(),
                index_type: IndexType::Keys,
            });
        }
        Ok(columns)
    }
}

fn validate_column_name(spec: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SchemaError::index_spec(spec, "missing column name"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SchemaError::index_spec(
            spec,
            format!("column name '{name}' may only contain letters, digits and '_'"),
        ));
    }
    Ok(())
}

fn parse_validation(spec: &str, ty: &str) -> Result<PrimitiveKind> {
    let tag = parse_simple(ty, ty).map_err(|e| SchemaError::index_spec(spec, e.to_string()))?;
    if tag.direction().is_reversed() {
        return Err(SchemaError::index_spec(
            spec,
            format!("validation type '{ty}' cannot be reversed"),
        ));
    }
    Ok(tag.kind())
}
