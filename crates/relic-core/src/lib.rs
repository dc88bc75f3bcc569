//! Core model layer for Relic: entity mappings, the bind-value model,
//! parameter normalization, and shard-table resolution.
//!
//! Nothing in this crate parses text or emits SQL; that lives in the
//! `relic` crate. Everything here is built once at startup and is safe
//! for unsynchronized concurrent reads afterwards.

pub mod error;
pub mod model;
pub mod params;
pub mod registry;
pub mod shard;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, descriptors, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{EntityMapping, FieldMapping, FieldType, RelationKind, RelationMapping},
        params::ParamBag,
        registry::MappingRegistry,
        value::Value,
    };
}
