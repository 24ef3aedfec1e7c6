//! Schema integration tests
//!
//! Registry totality and idempotence, per-store alphabets, config files, and
//! the schema-checked store wrapper.

#[path = "../common/mod.rs"]
mod common;

mod config_file;
mod registry;
mod store;
