//! Boolean criteria expressions.
//!
//! The textual grammar accepts `and`/`,` and `or` as infix keywords
//! with `and` binding tighter than `or`, `:` as shorthand for `eq`,
//! and parentheses for explicit grouping. Parsing is pure and
//! stateless; the AST is built once per call and never shared.

mod parser;
mod token;


pub use parser::parse;

use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FilterNode
///
/// Parsed criteria tree. `Group` is only produced by explicit
/// parentheses so the canonical rendering round-trips exactly.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FilterNode {
    Comparison(Comparison),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Group(Box<Self>),
}

impl FilterNode {
    #[must_use]
    pub fn comparison(
        field: impl Into<String>,
        op: CompareOp,
        value: FilterValue,
    ) -> Self {
        Self::Comparison(Comparison {
            field: field.into(),
            op,
            value,
        })
    }

    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison(c) => write!(f, "{c}"),
            Self::And(l, r) => write!(f, "{l} and {r}"),
            Self::Or(l, r) => write!(f, "{l} or {r}"),
            Self::Group(inner) => write!(f, "({inner})"),
        }
    }
}

///
/// Comparison
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Comparison {
    pub field: String,
    pub op: CompareOp,
    pub value: FilterValue,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

///
/// CompareOp
///
/// `:` in source text is an alias for `eq` and normalizes to it.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    In,
}

impl CompareOp {
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        let op = match word.to_ascii_lowercase().as_str() {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "gt" => Self::Gt,
            "ge" => Self::Ge,
            "lt" => Self::Lt,
            "le" => Self::Le,
            "like" => Self::Like,
            "in" => Self::In,
            _ => return None,
        };

        Some(op)
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Like => "like",
            Self::In => "in",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

///
/// FilterValue
///
/// Right-hand side of a comparison as written: a bare token or a
/// quoted string. Coercion into a typed bind value happens later,
/// against the resolved field's column type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FilterValue {
    Word(String),
    Quoted(String),
}

impl FilterValue {
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Word(s) | Self::Quoted(s) => s,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(s) => write!(f, "{s}"),
            Self::Quoted(s) => write!(f, "'{s}'"),
        }
    }
}
