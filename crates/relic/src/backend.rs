//! Execution seam.
//!
//! The engine builds SQL and parameters; running the statement belongs
//! to an external collaborator behind [`SqlBackend`]. Connection
//! pooling, transactions, timeouts, and retries all live on the other
//! side of this trait.

use crate::error::BackendError;
use derive_more::{Deref, IntoIterator};
use relic_core::{params::ParamBag, value::Value};

///
/// Row
///
/// One result row as returned by the backend: column label / value
/// pairs in select-list order.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
pub struct Row {
    #[deref]
    #[into_iterator]
    cells: Vec<(String, Value)>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<(String, Value)>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

///
/// SqlBackend
///
/// JDBC-like collaborator: one parameterized statement in, rows out.
/// The engine issues exactly one statement per query call.
///

pub trait SqlBackend {
    fn select(&self, sql: &str, params: &ParamBag) -> Result<Vec<Row>, BackendError>;
}
