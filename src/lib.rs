//! colkey - order-preserving composite keys for wide-column entity storage
//!
//! Entity properties, secondary indexes, unique claims and index history are
//! all stored as rows and columns addressed by composite keys: sequences of
//! typed components, each ascending or descending. colkey encodes those keys
//! so that plain unsigned byte comparison in the store reproduces the
//! intended multi-component ordering, and describes the stores that hold
//! them.
//!
//! # Quick Start
//!
//! ```ignore
//! use colkey::{Component, SchemaRegistry};
//!
//! let schema = SchemaRegistry::application()?;
//! let codec = schema.codec("Entity_Index")?;
//!
//! let key = codec.encode(&[
//!     Component::forward("alice"),
//!     Component::reversed(42i64),
//! ])?;
//! let components = codec.decode(&key)?;
//! ```
//!
//! # Architecture
//!
//! - `colkey-core`: tag registry, component values, the composite codec
//! - `colkey-schema`: store descriptors, the schema registry, configuration,
//!   and the schema-checked store wrapper

pub use colkey_core::uuid_time;
pub use colkey_core::{
    compare_components, Component, ComponentValue, CompositeCodec, Direction, KeyError, KeyLimits,
    PrimitiveKind, TagAlphabet, TypeTag, TypeTagRegistry, MAX_COMPONENT_BYTES,
};
pub use colkey_schema::{
    stale_entries, ApplicationCf, Cell, ColumnFamilyDef, ColumnFamilyDescriptor, Comparator,
    IndexColumnSpec, IndexEntry, IndexMetadataBuilder, IndexType, MemoryStore, SchemaConfig,
    SchemaError, SchemaRegistry, SchemaRegistryBuilder, SchemaStore, SortedStore,
    UniqueConstraintRecord, ValueValidator, WriteKind, CONFIG_FILE_NAME,
    DEFAULT_DYNAMIC_COMPOSITE_ALIASES,
};
