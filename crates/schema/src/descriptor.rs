//! Column family descriptors
//!
//! A [`ColumnFamilyDef`] is a store declaration as written: plain strings,
//! suitable for constants and config files. [`ColumnFamilyDescriptor`] is the
//! parsed, validated, immutable form the rest of the system consumes.

use crate::comparator::{Comparator, ValueValidator};
use crate::error::{Result, SchemaError};
use crate::index::{IndexColumnSpec, IndexMetadataBuilder};
use colkey_core::{CompositeCodec, KeyLimits, TagAlphabet, TypeTagRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A store declaration before parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilyDef {
    /// Store name
    pub name: String,
    /// Comparator spec
    pub comparator: String,
    /// Value validator spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    /// Secondary index spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<String>,
    /// Whether provisioning must create the store if absent
    #[serde(default = "default_create")]
    pub create: bool,
}

fn default_create() -> bool {
    true
}

impl ColumnFamilyDef {
    /// Declaration with only a name and comparator
    pub fn new(name: impl Into<String>, comparator: impl Into<String>) -> Self {
        ColumnFamilyDef {
            name: name.into(),
            comparator: comparator.into(),
            validator: None,
            indexes: None,
            create: true,
        }
    }

    /// Set the value validator
    pub fn with_validator(mut self, validator: impl Into<String>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    /// Set the secondary index spec
    pub fn with_indexes(mut self, indexes: impl Into<String>) -> Self {
        self.indexes = Some(indexes.into());
        self
    }

    /// Mark the store as pre-existing (not auto-provisioned)
    pub fn pre_existing(mut self) -> Self {
        self.create = false;
        self
    }
}

/// Kinds of write a store can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteKind {
    /// Put or overwrite a column value
    Value,
    /// Merge an increment into a counter column
    Increment,
    /// Remove a column or row
    Delete,
}

impl WriteKind {
    /// Short name for errors and logs
    pub const fn name(&self) -> &'static str {
        match self {
            WriteKind::Value => "value",
            WriteKind::Increment => "increment",
            WriteKind::Delete => "delete",
        }
    }
}

/// Parsed, immutable description of one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFamilyDescriptor {
    name: String,
    comparator: Comparator,
    validator: Option<ValueValidator>,
    indexes: Vec<IndexColumnSpec>,
    create: bool,
}

impl ColumnFamilyDescriptor {
    /// Parse a declaration against the given tag registry
    ///
    /// # Errors
    ///
    /// `InvalidComparator` for a bad comparator or validator and
    /// `InvalidIndexSpec` for a bad index declaration.
    pub fn from_def(def: &ColumnFamilyDef, registry: &TypeTagRegistry) -> Result<Self> {
        let name = def.name.trim();
        if name.is_empty() {
            return Err(SchemaError::Config("store name cannot be empty".to_string()));
        }
        let comparator = Comparator::parse_with(&def.comparator, registry)?;
        let validator = def
            .validator
            .as_deref()
            .map(ValueValidator::parse)
            .transpose()?;
        let indexes = IndexMetadataBuilder::parse(def.indexes.as_deref())?;
        if !indexes.is_empty() && validator.is_some_and(|v| v.is_counter()) {
            return Err(SchemaError::index_spec(
                def.indexes.as_deref().unwrap_or_default(),
                "counter stores cannot carry secondary indexes",
            ));
        }
        Ok(ColumnFamilyDescriptor {
            name: name.to_string(),
            comparator,
            validator,
            indexes,
            create: def.create,
        })
    }

    /// Store name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column comparator
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Value validator, if declared
    pub fn validator(&self) -> Option<ValueValidator> {
        self.validator
    }

    /// True when the comparator is a dynamic composite
    pub fn is_composite(&self) -> bool {
        self.comparator.is_composite()
    }

    /// True when the store holds only counters
    pub fn is_counter(&self) -> bool {
        self.validator.is_some_and(|v| v.is_counter())
    }

    /// Legal tag alphabet (composite stores only)
    pub fn alphabet(&self) -> Option<TagAlphabet> {
        self.comparator.alphabet()
    }

    /// Secondary index column definitions; empty when none are declared
    pub fn index_metadata(&self) -> &[IndexColumnSpec] {
        &self.indexes
    }

    /// Whether provisioning must create the store if absent
    pub fn create(&self) -> bool {
        self.create
    }

    /// Codec for column names of this store
    pub fn codec(&self, registry: Arc<TypeTagRegistry>, limits: KeyLimits) -> Result<CompositeCodec> {
        let alphabet = self
            .alphabet()
            .ok_or_else(|| SchemaError::NotComposite(self.name.clone()))?;
        Ok(CompositeCodec::new(registry, alphabet).with_limits(limits))
    }

    /// Check that the store accepts a kind of write
    ///
    /// Counter stores take increments and deletes only; every other store
    /// rejects increments.
    pub fn check_write(&self, kind: WriteKind) -> Result<()> {
        let allowed = match kind {
            WriteKind::Delete => true,
            WriteKind::Increment => self.is_counter(),
            WriteKind::Value => !self.is_counter(),
        };
        if allowed {
            return Ok(());
        }
        Err(SchemaError::UnsupportedWrite {
            store: self.name.clone(),
            operation: kind.name(),
        })
    }

    /// Render back into a declaration
    pub fn to_def(&self) -> ColumnFamilyDef {
        let indexes = if self.indexes.is_empty() {
            None
        } else {
            Some(
                self.indexes
                    .iter()
                    .map(|c| format!("{}:{}", c.column_name, c.validation_class.type_name()))
                    .collect::<Vec<_>>()
                    .join(","),
            )
        };
        ColumnFamilyDef {
            name: self.name.clone(),
            comparator: self.comparator.to_string(),
            validator: self.validator.map(|v| v.to_string()),
            indexes,
            create: self.create,
        }
    }
}
