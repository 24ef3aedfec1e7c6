//! Schema registry
//!
//! The registry is built once at startup and read-only afterwards. Every
//! declaration is parsed during `build()`, so a bad comparator or index spec
//! fails initialization instead of the first write that touches the store.
//! Descriptors are shared as `Arc`s; lookups never copy them.

use crate::application::ApplicationCf;
use crate::config::SchemaConfig;
use crate::descriptor::{ColumnFamilyDef, ColumnFamilyDescriptor};
use crate::error::{Result, SchemaError};
use crate::index::IndexColumnSpec;
use colkey_core::{CompositeCodec, KeyLimits, TypeTagRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable table of store descriptors, keyed by name
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tags: Arc<TypeTagRegistry>,
    limits: KeyLimits,
    stores: BTreeMap<String, Arc<ColumnFamilyDescriptor>>,
}

impl SchemaRegistry {
    /// Start an empty builder on the standard tag registry
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Registry holding exactly the application stores
    pub fn application() -> Result<Self> {
        Self::builder().with_application().build()
    }

    /// Registry described by a loaded config
    pub fn from_config(config: &SchemaConfig) -> Result<Self> {
        let mut builder = Self::builder().limits(config.limits);
        if config.include_application {
            builder = builder.with_application();
        }
        for def in &config.column_families {
            builder = builder.register(def.clone());
        }
        builder.build()
    }

    /// Descriptor for a store
    ///
    /// # Errors
    ///
    /// `UnknownStore` if no store has that name.
    pub fn describe(&self, name: &str) -> Result<Arc<ColumnFamilyDescriptor>> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownStore(name.to_string()))
    }

    /// Whether a store uses a composite comparator
    pub fn is_composite(&self, name: &str) -> Result<bool> {
        Ok(self.describe(name)?.is_composite())
    }

    /// Secondary index columns for a store; empty when it declares none
    pub fn index_metadata(&self, name: &str) -> Result<Vec<IndexColumnSpec>> {
        Ok(self.describe(name)?.index_metadata().to_vec())
    }

    /// Codec for a composite store's column names
    ///
    /// # Errors
    ///
    /// `UnknownStore` for an unregistered name, `NotComposite` for a store
    /// with a simple comparator.
    pub fn codec(&self, name: &str) -> Result<CompositeCodec> {
        self.describe(name)?.codec(Arc::clone(&self.tags), self.limits)
    }

    /// Registered store names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stores.keys().map(String::as_str)
    }

    /// All descriptors, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ColumnFamilyDescriptor>> + '_ {
        self.stores.values()
    }

    /// Descriptors provisioning must create if absent
    pub fn stores_to_create(&self) -> Vec<Arc<ColumnFamilyDescriptor>> {
        self.stores.values().filter(|d| d.create()).cloned().collect()
    }

    /// Tag registry shared by every codec this schema hands out
    pub fn tags(&self) -> &Arc<TypeTagRegistry> {
        &self.tags
    }

    /// Key limits applied by codecs
    pub fn limits(&self) -> KeyLimits {
        self.limits
    }

    /// Number of registered stores
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// True when no store is registered
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// Collects declarations for a [`SchemaRegistry`]
#[derive(Debug, Clone)]
pub struct SchemaRegistryBuilder {
    tags: Arc<TypeTagRegistry>,
    limits: KeyLimits,
    defs: Vec<ColumnFamilyDef>,
}

impl Default for SchemaRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistryBuilder {
    /// Empty builder on the standard tag registry
    pub fn new() -> Self {
        SchemaRegistryBuilder {
            tags: TypeTagRegistry::standard(),
            limits: KeyLimits::default(),
            defs: Vec::new(),
        }
    }

    /// Use a specific tag registry
    pub fn tags(mut self, tags: Arc<TypeTagRegistry>) -> Self {
        self.tags = tags;
        self
    }

    /// Key limits for codecs
    pub fn limits(mut self, limits: KeyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Add one declaration
    pub fn register(mut self, def: ColumnFamilyDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Add every application store
    pub fn with_application(mut self) -> Self {
        self.defs
            .extend(ApplicationCf::ALL.iter().map(ApplicationCf::definition));
        self
    }

    /// Parse every declaration and freeze the registry
    ///
    /// # Errors
    ///
    /// The first declaration error encountered, or `DuplicateStore` when two
    /// declarations share a name.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut stores = BTreeMap::new();
        for def in &self.defs {
            let descriptor = ColumnFamilyDescriptor::from_def(def, &self.tags)?;
            let name = descriptor.name().to_string();
            if stores.contains_key(&name) {
                return Err(SchemaError::DuplicateStore(name));
            }
            debug!(
                target: "colkey::schema",
                store = %name,
                composite = descriptor.is_composite(),
                counter = descriptor.is_counter(),
                indexes = descriptor.index_metadata().len(),
                "Registered store"
            );
            stores.insert(name, Arc::new(descriptor));
        }
        info!(target: "colkey::schema", stores = stores.len(), "Schema registry built");
        Ok(SchemaRegistry {
            tags: self.tags,
            limits: self.limits,
            stores,
        })
    }
}
