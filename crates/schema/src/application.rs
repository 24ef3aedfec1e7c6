//! The fixed set of per-application stores

use crate::comparator::{DEFAULT_DYNAMIC_COMPOSITE_ALIASES, DYNAMIC_COMPOSITE_TYPE, MARSHAL_PACKAGE};
use crate::descriptor::ColumnFamilyDef;
use std::fmt;

/// Stores every application keyspace is provisioned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApplicationCf {
    /// Entity objects
    EntityProperties,
    /// Name/value dictionaries per entity
    EntityDictionaries,
    /// Rows of entity UUIDs; backs collections
    EntityIdSets,
    /// Dynamic (untyped) entity dictionaries
    EntityCompositeDictionaries,
    /// Legacy entity metadata
    EntityMetadata,
    /// Secondary index rows for entities
    EntityIndex,
    /// Unique property values and their owners
    EntityUnique,
    /// Every property ever indexed for an entity
    EntityIndexEntries,
    /// Roles defined in the application
    ApplicationRoles,
    /// Application-wide aggregate counters
    ApplicationAggregateCounters,
    /// Per-entity counters
    EntityCounters,
}

impl ApplicationCf {
    /// All application stores, in declaration order
    pub const ALL: [ApplicationCf; 11] = [
        ApplicationCf::EntityProperties,
        ApplicationCf::EntityDictionaries,
        ApplicationCf::EntityIdSets,
        ApplicationCf::EntityCompositeDictionaries,
        ApplicationCf::EntityMetadata,
        ApplicationCf::EntityIndex,
        ApplicationCf::EntityUnique,
        ApplicationCf::EntityIndexEntries,
        ApplicationCf::ApplicationRoles,
        ApplicationCf::ApplicationAggregateCounters,
        ApplicationCf::EntityCounters,
    ];

    /// Store name
    pub const fn name(&self) -> &'static str {
        match self {
            ApplicationCf::EntityProperties => "Entity_Properties",
            ApplicationCf::EntityDictionaries => "Entity_Dictionaries",
            ApplicationCf::EntityIdSets => "Entity_Id_Sets",
            ApplicationCf::EntityCompositeDictionaries => "Entity_Composite_Dictionaries",
            ApplicationCf::EntityMetadata => "Entity_Metadata",
            ApplicationCf::EntityIndex => "Entity_Index",
            ApplicationCf::EntityUnique => "Entity_Unique",
            ApplicationCf::EntityIndexEntries => "Entity_Index_Entries",
            ApplicationCf::ApplicationRoles => "Application_Roles",
            ApplicationCf::ApplicationAggregateCounters => "Application_Aggregate_Counters",
            ApplicationCf::EntityCounters => "Entity_Counters",
        }
    }

    /// Look up a store by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cf| cf.name() == name)
    }

    /// Comparator declaration
    pub fn comparator(&self) -> String {
        match self {
            ApplicationCf::EntityIdSets | ApplicationCf::EntityUnique => "UUIDType".to_string(),
            ApplicationCf::ApplicationAggregateCounters => "LongType".to_string(),
            ApplicationCf::EntityCompositeDictionaries
            | ApplicationCf::EntityIndex
            | ApplicationCf::EntityIndexEntries => {
                format!("{DYNAMIC_COMPOSITE_TYPE}{DEFAULT_DYNAMIC_COMPOSITE_ALIASES}")
            }
            ApplicationCf::EntityProperties
            | ApplicationCf::EntityDictionaries
            | ApplicationCf::EntityMetadata
            | ApplicationCf::ApplicationRoles
            | ApplicationCf::EntityCounters => "BytesType".to_string(),
        }
    }

    /// Value validator declaration, if any
    pub fn validator(&self) -> Option<String> {
        match self {
            ApplicationCf::ApplicationAggregateCounters | ApplicationCf::EntityCounters => {
                Some(format!("{MARSHAL_PACKAGE}CounterColumnType"))
            }
            _ => None,
        }
    }

    /// The store's declaration
    pub fn definition(&self) -> ColumnFamilyDef {
        ColumnFamilyDef {
            name: self.name().to_string(),
            comparator: self.comparator(),
            validator: self.validator(),
            indexes: None,
            create: true,
        }
    }
}

impl fmt::Display for ApplicationCf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
