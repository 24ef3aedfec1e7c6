//! Core composite key types for colkey
//!
//! This crate defines the byte-level key model shared by every store:
//! - TypeTag / TypeTagRegistry: one-byte tags naming a primitive kind and direction
//! - ComponentValue: typed component payloads and their canonical raw forms
//! - Component: a tagged value
//! - CompositeCodec: order-preserving encode/decode of component sequences
//! - KeyLimits: size limits enforced by the codec
//! - KeyError: error taxonomy for all of the above
//!
//! Everything here is pure: no I/O, no locking, no shared mutable state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod component;
pub mod error;
pub mod limits;
pub mod tag;
pub mod uuid_time;
pub mod value;

pub use codec::{CompositeCodec, TagAlphabet};
pub use component::{compare_components, Component};
pub use error::{KeyError, Result};
pub use limits::{KeyLimits, MAX_COMPONENT_BYTES};
pub use tag::{Direction, PrimitiveKind, TypeTag, TypeTagRegistry};
pub use value::ComponentValue;
