//! Composite codec integration tests
//!
//! Exercise the codec through the public facade: the scenarios the store
//! layer relies on, mixed-direction ordering, and rejection of bad input.

#[path = "../common/mod.rs"]
mod common;

mod malformed;
mod ordering;
mod scenarios;
