//! Shared test utilities for all integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Arc;

pub use colkey::uuid_time::{new_time_uuid, time_uuid_from_unix_micros};
pub use colkey::{
    ApplicationCf, ColumnFamilyDef, Component, ComponentValue, CompositeCodec, Direction,
    KeyError, KeyLimits, MemoryStore, PrimitiveKind, SchemaConfig, SchemaError, SchemaRegistry,
    SchemaStore, TagAlphabet, TypeTag, TypeTagRegistry,
};
pub use uuid::Uuid;

/// Node id used for every generated time UUID
pub const NODE: [u8; 6] = [0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F];

// ============================================================================
// Values
// ============================================================================

/// Time UUID for a Unix timestamp in microseconds
pub fn time_uuid(micros: u64) -> Uuid {
    time_uuid_from_unix_micros(micros, 0, NODE)
}

/// Deterministic entity id
pub fn entity(n: u8) -> Uuid {
    Uuid::from_bytes([n; 16])
}

/// Forward tag for a kind
pub fn fwd(kind: PrimitiveKind) -> TypeTag {
    TypeTag::canonical(kind, Direction::Forward)
}

/// Reversed tag for a kind
pub fn rev(kind: PrimitiveKind) -> TypeTag {
    TypeTag::canonical(kind, Direction::Reversed)
}

// ============================================================================
// Schema
// ============================================================================

/// Schema holding the application stores
pub fn app_schema() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::application().expect("application schema builds"))
}

/// Schema-checked store over a fresh in-memory backend
pub fn app_store() -> SchemaStore<MemoryStore> {
    SchemaStore::new(app_schema(), MemoryStore::new()).expect("application stores present")
}

/// Codec accepting every registered tag
pub fn full_codec() -> CompositeCodec {
    CompositeCodec::standard()
}
