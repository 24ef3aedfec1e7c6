//! Column-family schema for colkey
//!
//! This crate describes the stores entity data lives in and how their keys
//! are shaped:
//! - Comparator / ValueValidator: parsed store type declarations
//! - ColumnFamilyDescriptor: one immutable, validated store description
//! - ApplicationCf: the fixed set of per-application stores
//! - SchemaRegistry: name → descriptor table, built once at startup
//! - IndexMetadataBuilder: secondary index declarations
//! - SchemaConfig: `colkey.toml` loading
//! - IndexEntry / UniqueConstraintRecord: key layouts for index history and
//!   unique-value claims
//! - SortedStore / SchemaStore: the consumed store seam and its checked wrapper

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod comparator;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod records;
pub mod registry;
pub mod store;

pub use application::ApplicationCf;
pub use comparator::{Comparator, ValueValidator, DEFAULT_DYNAMIC_COMPOSITE_ALIASES};
pub use config::{SchemaConfig, CONFIG_FILE_NAME};
pub use descriptor::{ColumnFamilyDef, ColumnFamilyDescriptor, WriteKind};
pub use error::{Result, SchemaError};
pub use index::{IndexColumnSpec, IndexMetadataBuilder, IndexType, DEFAULT_INDEX_VALIDATION};
pub use records::{stale_entries, IndexEntry, UniqueConstraintRecord};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use store::{Cell, MemoryStore, SchemaStore, SortedStore};
