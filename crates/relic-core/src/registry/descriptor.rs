use crate::{
    model::{CascadeAction, FieldCodec, FieldType, JoinPair, RelationKind, ShardingConfig},
    shard::ShardStrategy,
};
use std::sync::Arc;

///
/// EntityDescriptor
///
/// Declarative input to the registry build. Descriptors carry no
/// behavior and no particular metadata-declaration mechanism; they can
/// be hand-written, produced by config loaders, or code-generated.
/// Omitted table/column names default to the snake_case identifier.
///

#[derive(Debug, Default)]
pub struct EntityDescriptor {
    pub name: String,
    pub table: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub key: Vec<String>,
    pub relations: Vec<RelationDescriptor>,
    pub sharding: Option<ShardingConfig>,
}

impl EntityDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    /// Declare the entity shardable with the default prefix strategy.
    #[must_use]
    pub fn sharded(mut self) -> Self {
        self.sharding = Some(ShardingConfig::default());
        self
    }

    #[must_use]
    pub fn sharded_with(mut self, strategy: Arc<dyn ShardStrategy>) -> Self {
        self.sharding = Some(ShardingConfig::new(strategy));
        self
    }
}

///
/// FieldDescriptor
///

#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: String,
    pub column: Option<String>,
    pub ty: FieldType,
    pub nullable: bool,
    pub codec: Option<Arc<dyn FieldCodec>>,
    pub generator: Option<String>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            column: None,
            ty,
            nullable: false,
            codec: None,
            generator: None,
        }
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn codec(mut self, codec: Arc<dyn FieldCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    #[must_use]
    pub fn generator(mut self, id: impl Into<String>) -> Self {
        self.generator = Some(id.into());
        self
    }
}

///
/// RelationDescriptor
///
/// The target is referenced by entity name only; resolution happens in
/// the registry's second pass. A required (non-optional) relation must
/// cascade with `Delete`.
///

#[derive(Debug)]
pub struct RelationDescriptor {
    pub name: String,
    pub kind: RelationKind,
    pub target: String,
    pub join: Vec<JoinPair>,
    pub optional: bool,
    pub cascade: CascadeAction,
}

impl RelationDescriptor {
    #[must_use]
    pub fn to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::ToOne, target)
    }

    #[must_use]
    pub fn to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::ToMany, target)
    }

    fn new(name: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            join: Vec::new(),
            optional: false,
            cascade: CascadeAction::Delete,
        }
    }

    #[must_use]
    pub fn join(mut self, local: impl Into<String>, target: impl Into<String>) -> Self {
        self.join.push(JoinPair::new(local, target));
        self
    }

    #[must_use]
    pub fn optional(mut self, cascade: CascadeAction) -> Self {
        self.optional = true;
        self.cascade = cascade;
        self
    }
}
