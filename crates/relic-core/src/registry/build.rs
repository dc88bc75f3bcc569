use crate::{
    error::MappingError,
    model::{CascadeAction, EntityMapping, FieldMapping, RelationMapping},
    registry::{EntityDescriptor, MappingRegistry, descriptor::FieldDescriptor},
};
use convert_case::{Case, Casing};
use std::collections::{BTreeMap, BTreeSet};

// Two-pass build: register all entity names, then construct and
// validate each mapping against the full name set.
pub(super) fn build(descriptors: Vec<EntityDescriptor>) -> Result<MappingRegistry, MappingError> {
    // Pass 1: names and per-entity field sets, so pass 2 can validate
    // relation join targets without ordering constraints.
    let mut field_sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for descriptor in &descriptors {
        let fields = descriptor
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect::<BTreeSet<_>>();

        if field_sets.insert(descriptor.name.clone(), fields).is_some() {
            return Err(MappingError::DuplicateEntity(descriptor.name.clone()));
        }
    }

    // Pass 2: construct mappings; relation targets resolve by name.
    let mut entities = BTreeMap::new();
    for descriptor in descriptors {
        let mapping = build_entity(descriptor, &field_sets)?;
        entities.insert(mapping.name().to_string(), mapping);
    }

    Ok(MappingRegistry::from_entities(entities))
}

fn build_entity(
    descriptor: EntityDescriptor,
    field_sets: &BTreeMap<String, BTreeSet<String>>,
) -> Result<EntityMapping, MappingError> {
    let entity = descriptor.name;
    let table = descriptor
        .table
        .unwrap_or_else(|| entity.to_case(Case::Snake));

    let fields = build_fields(&entity, descriptor.fields)?;
    let key = resolve_key(&entity, &descriptor.key, &fields)?;
    let relations = build_relations(&entity, descriptor.relations, &fields, field_sets)?;

    Ok(EntityMapping::new(
        entity,
        table,
        fields,
        key,
        relations,
        descriptor.sharding,
    ))
}

fn build_fields(
    entity: &str,
    descriptors: Vec<FieldDescriptor>,
) -> Result<Vec<FieldMapping>, MappingError> {
    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if !seen.insert(descriptor.name.clone()) {
            return Err(MappingError::DuplicateField {
                entity: entity.to_string(),
                field: descriptor.name,
            });
        }

        let column = descriptor
            .column
            .unwrap_or_else(|| descriptor.name.to_case(Case::Snake));

        fields.push(FieldMapping {
            name: descriptor.name,
            column,
            ty: descriptor.ty,
            nullable: descriptor.nullable,
            codec: descriptor.codec,
            generator: descriptor.generator,
        });
    }

    Ok(fields)
}

// Key fields must be declared fields; order is preserved because it is
// authoritative for positional id binding.
fn resolve_key(
    entity: &str,
    key: &[String],
    fields: &[FieldMapping],
) -> Result<Vec<usize>, MappingError> {
    if key.is_empty() {
        return Err(MappingError::MissingKey {
            entity: entity.to_string(),
        });
    }

    key.iter()
        .map(|name| {
            fields.iter().position(|f| &f.name == name).ok_or_else(|| {
                MappingError::UnknownKeyField {
                    entity: entity.to_string(),
                    field: name.clone(),
                }
            })
        })
        .collect()
}

fn build_relations(
    entity: &str,
    descriptors: Vec<crate::registry::RelationDescriptor>,
    fields: &[FieldMapping],
    field_sets: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<RelationMapping>, MappingError> {
    let mut seen = BTreeSet::new();
    let mut relations = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if !seen.insert(descriptor.name.clone()) {
            return Err(MappingError::DuplicateRelation {
                entity: entity.to_string(),
                relation: descriptor.name,
            });
        }

        let Some(target_fields) = field_sets.get(&descriptor.target) else {
            return Err(MappingError::UnresolvedRelationTarget {
                entity: entity.to_string(),
                relation: descriptor.name,
                target: descriptor.target,
            });
        };

        if descriptor.join.is_empty() {
            return Err(MappingError::MissingJoin {
                entity: entity.to_string(),
                relation: descriptor.name,
            });
        }

        for pair in &descriptor.join {
            if !fields.iter().any(|f| f.name == pair.local) {
                return Err(MappingError::UnknownJoinField {
                    entity: entity.to_string(),
                    relation: descriptor.name.clone(),
                    field: pair.local.clone(),
                    side: "the local entity",
                });
            }
            if !target_fields.contains(&pair.target) {
                return Err(MappingError::UnknownJoinField {
                    entity: entity.to_string(),
                    relation: descriptor.name.clone(),
                    field: pair.target.clone(),
                    side: "the target entity",
                });
            }
        }

        if !descriptor.optional && descriptor.cascade != CascadeAction::Delete {
            return Err(MappingError::InvalidCascade {
                entity: entity.to_string(),
                relation: descriptor.name,
                cascade: descriptor.cascade.to_string(),
            });
        }

        relations.push(RelationMapping {
            name: descriptor.name,
            kind: descriptor.kind,
            target: descriptor.target,
            join: descriptor.join,
            optional: descriptor.optional,
            cascade: descriptor.cascade,
        });
    }

    Ok(relations)
}
