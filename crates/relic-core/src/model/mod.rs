//! Static entity mapping model.
//!
//! Built once by [`crate::registry::MappingRegistry`] from descriptors
//! and never mutated afterwards.

pub mod codec;
pub mod entity;
pub mod field;
pub mod record;
pub mod relation;
pub mod sharding;

pub use codec::{CodecError, FieldCodec, JsonFieldCodec};
pub use entity::EntityMapping;
pub use field::{FieldMapping, FieldType};
pub use record::Record;
pub use relation::{CascadeAction, JoinPair, RelationKind, RelationMapping};
pub use sharding::ShardingConfig;
