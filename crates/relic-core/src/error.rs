use thiserror::Error as ThisError;

///
/// MappingError
///
/// Fatal build-time failures of the mapping graph. Raised while the
/// registry is constructed during startup and never recovered; a
/// process must not start with an invalid mapping graph.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MappingError {
    #[error("duplicate entity '{0}'")]
    DuplicateEntity(String),

    #[error("entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    #[error("entity '{entity}' declares relation '{relation}' more than once")]
    DuplicateRelation { entity: String, relation: String },

    #[error(
        "entity '{entity}' relation '{relation}' is required but cascades with '{cascade}' (must be delete)"
    )]
    InvalidCascade {
        entity: String,
        relation: String,
        cascade: String,
    },

    #[error("entity '{entity}' relation '{relation}' declares no join field pairs")]
    MissingJoin { entity: String, relation: String },

    #[error("entity '{entity}' declares no key fields")]
    MissingKey { entity: String },

    #[error(
        "entity '{entity}' relation '{relation}' joins through undeclared field '{field}' on {side}"
    )]
    UnknownJoinField {
        entity: String,
        relation: String,
        field: String,
        side: &'static str,
    },

    #[error("entity '{entity}' declares key field '{field}' that is not a declared field")]
    UnknownKeyField { entity: String, field: String },

    #[error("entity '{entity}' relation '{relation}' targets unknown entity '{target}'")]
    UnresolvedRelationTarget {
        entity: String,
        relation: String,
        target: String,
    },
}
