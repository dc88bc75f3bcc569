use std::fmt;

///
/// RelationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationKind {
    ToOne,
    ToMany,
}

///
/// CascadeAction
///
/// Delete-time policy for rows on the target side of a relation.
/// A non-optional relation must use `Delete`; the registry enforces
/// this at build time.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CascadeAction {
    Delete,
    SetNull,
    /// Custom criteria applied to the target entity on cascade.
    Filter(String),
}

impl fmt::Display for CascadeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::SetNull => write!(f, "set_null"),
            Self::Filter(expr) => write!(f, "filter({expr})"),
        }
    }
}

///
/// JoinPair
///
/// One local/target field pair forming part of a relation's join
/// condition.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinPair {
    pub local: String,
    pub target: String,
}

impl JoinPair {
    #[must_use]
    pub fn new(local: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            target: target.into(),
        }
    }
}

///
/// RelationMapping
///
/// A named reference from one entity to another. The target is held by
/// entity name and resolved during the registry's second build pass so
/// mutually-referencing entities can both register first.
///

#[derive(Clone, Debug)]
pub struct RelationMapping {
    pub name: String,
    pub kind: RelationKind,
    /// Target entity name; guaranteed resolvable once the registry has
    /// been built.
    pub target: String,
    pub join: Vec<JoinPair>,
    pub optional: bool,
    pub cascade: CascadeAction,
}
