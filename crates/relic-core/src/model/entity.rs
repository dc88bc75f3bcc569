use crate::model::{FieldMapping, RelationMapping, ShardingConfig};
use std::collections::BTreeMap;

///
/// EntityMapping
///
/// Static description of one mapped entity. Built exclusively by the
/// registry; all access is read-only and safe to share across threads.
/// Key-field order is stable and authoritative for positional id
/// binding.
///

#[derive(Debug)]
pub struct EntityMapping {
    name: String,
    table: String,
    fields: Vec<FieldMapping>,
    /// Indexes into `fields`, in declared key order.
    key: Vec<usize>,
    relations: Vec<RelationMapping>,
    sharding: Option<ShardingConfig>,
    /// Field-name lookup table, precomputed at build time.
    index: BTreeMap<String, usize>,
}

impl EntityMapping {
    /// Registry-internal constructor. Indices in `key` must point into
    /// `fields`; the registry validates this before calling.
    pub(crate) fn new(
        name: String,
        table: String,
        fields: Vec<FieldMapping>,
        key: Vec<usize>,
        relations: Vec<RelationMapping>,
        sharding: Option<ShardingConfig>,
    ) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Self {
            name,
            table,
            fields,
            key,
            relations,
            sharding,
            index,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical (unsharded) table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Primary-key fields in declared order. Always non-empty.
    pub fn key_fields(&self) -> impl Iterator<Item = &FieldMapping> {
        self.key.iter().map(|&i| &self.fields[i])
    }

    #[must_use]
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    #[must_use]
    pub fn relations(&self) -> &[RelationMapping] {
        &self.relations
    }

    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationMapping> {
        self.relations.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub const fn sharding(&self) -> Option<&ShardingConfig> {
        self.sharding.as_ref()
    }

    #[must_use]
    pub const fn is_sharded(&self) -> bool {
        self.sharding.is_some()
    }
}
