//! Mapping registry: the two-pass build that turns declarative entity
//! descriptors into an immutable [`EntityMapping`] graph.
//!
//! Pass one registers every entity name so mutually-referencing
//! entities can both exist before either is resolved. Pass two builds
//! each mapping and validates relations against the full name set.
//! Any failure is a fatal [`MappingError`]; there is no partial
//! registry.

mod build;
mod descriptor;

#[cfg(test)]
mod tests;

pub use descriptor::{EntityDescriptor, FieldDescriptor, RelationDescriptor};

use crate::{error::MappingError, model::EntityMapping};
use std::collections::BTreeMap;

///
/// MappingRegistry
///
/// Read-only owner of every [`EntityMapping`]. Constructed once,
/// single-threaded, at startup; safe for unsynchronized concurrent
/// reads afterwards.
///

#[derive(Debug)]
pub struct MappingRegistry {
    entities: BTreeMap<String, EntityMapping>,
}

impl MappingRegistry {
    pub fn build(descriptors: Vec<EntityDescriptor>) -> Result<Self, MappingError> {
        build::build(descriptors)
    }

    pub(crate) const fn from_entities(entities: BTreeMap<String, EntityMapping>) -> Self {
        Self { entities }
    }

    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&EntityMapping> {
        self.entities.get(entity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityMapping> {
        self.entities.values()
    }
}
