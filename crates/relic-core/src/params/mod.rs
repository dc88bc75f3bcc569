//! Parameter normalization.
//!
//! Call sites hand the engine maps, positional arrays, prebuilt bags,
//! or entity records; everything is normalized into a [`ParamBag`]
//! before SQL execution. Bags are created per call and discarded after
//! the statement runs.

mod key;


pub use key::resolve_key_params;

use crate::{model::Record, value::Value};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ParamError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParamError {
    #[error("invalid parameter: {0}")]
    Invalid(String),

    #[error("unsupported parameter shape: {0}")]
    Unsupported(String),
}

///
/// ParamBag
///
/// Uniform container of bind values, either named or positional.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ParamBag {
    slots: Slots,
}

#[derive(Clone, Debug, PartialEq)]
enum Slots {
    Named(BTreeMap<String, Value>),
    Positional(Vec<Value>),
}

impl ParamBag {
    #[must_use]
    pub const fn named(values: BTreeMap<String, Value>) -> Self {
        Self {
            slots: Slots::Named(values),
        }
    }

    #[must_use]
    pub const fn positional(values: Vec<Value>) -> Self {
        Self {
            slots: Slots::Positional(values),
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slots: Slots::Positional(Vec::new()),
        }
    }

    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self.slots, Slots::Named(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.slots {
            Slots::Named(m) => m.len(),
            Slots::Positional(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match &self.slots {
            Slots::Named(m) => m.get(name),
            Slots::Positional(_) => None,
        }
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<&Value> {
        match &self.slots {
            Slots::Named(_) => None,
            Slots::Positional(v) => v.get(index),
        }
    }

    /// Bind values in a stable order: insertion order for positional
    /// bags, name order for named bags.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        match &self.slots {
            Slots::Named(m) => Iter::Named(m.values()),
            Slots::Positional(v) => Iter::Positional(v.iter()),
        }
    }
}

enum Iter<'a> {
    Named(std::collections::btree_map::Values<'a, String, Value>),
    Positional(std::slice::Iter<'a, Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Named(it) => it.next(),
            Self::Positional(it) => it.next(),
        }
    }
}

///
/// ParamInput
///
/// The call-site shapes the strategy accepts. Entity records are a
/// distinct variant because they must be special-cased ahead of
/// generic record projection during key resolution.
///

pub enum ParamInput<'a> {
    Scalar(Value),
    Positional(Vec<Value>),
    Named(BTreeMap<String, Value>),
    Bag(ParamBag),
    Record(&'a dyn Record),
}

impl From<Value> for ParamInput<'_> {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Value>> for ParamInput<'_> {
    fn from(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }
}

impl From<BTreeMap<String, Value>> for ParamInput<'_> {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self::Named(values)
    }
}

impl From<ParamBag> for ParamInput<'_> {
    fn from(bag: ParamBag) -> Self {
        Self::Bag(bag)
    }
}

impl<'a> From<&'a dyn Record> for ParamInput<'a> {
    fn from(record: &'a dyn Record) -> Self {
        Self::Record(record)
    }
}

/// Normalize a call-site value into a [`ParamBag`].
///
/// Precedence: a map is wrapped directly, a bag is passed through, a
/// bare scalar is rejected (it cannot become a named bag), a positional
/// array is wrapped positionally, and a record is projected through its
/// accessor table.
pub fn to_param_bag(input: ParamInput<'_>) -> Result<ParamBag, ParamError> {
    match input {
        ParamInput::Named(values) => Ok(ParamBag::named(values)),
        ParamInput::Bag(bag) => Ok(bag),
        ParamInput::Scalar(value) => Err(ParamError::Invalid(format!(
            "scalar {} value cannot be converted to a named parameter bag",
            value.type_name()
        ))),
        ParamInput::Positional(values) => Ok(ParamBag::positional(values)),
        ParamInput::Record(record) => Ok(ParamBag::named(project_record(record))),
    }
}

fn project_record(record: &dyn Record) -> BTreeMap<String, Value> {
    record
        .field_names()
        .iter()
        .filter_map(|name| {
            record
                .get(name)
                .map(|value| ((*name).to_string(), value))
        })
        .collect()
}
