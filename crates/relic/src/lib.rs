//! Query and mapping engine over the `relic-core` model layer.
//!
//! Text in, rows out: filter expressions, expansion lists, and order-by
//! fragments are parsed and validated here, composed into a single
//! parameterized SELECT, and handed to a [`backend::SqlBackend`] for
//! execution. The engine never opens connections and never retries.

pub mod backend;
pub mod error;
pub mod executor;
pub mod expand;
pub mod filter;
pub mod fragment;
pub mod sql;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, descriptors, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        backend::{Row, SqlBackend},
        executor::{QueryContext, QueryExecutor, QueryOptions, RecordRow},
        expand::Expand,
        filter::{CompareOp, Comparison, FilterNode, FilterValue},
        fragment::OrderBy,
        sql::Page,
    };
    pub use relic_core::prelude::*;
}
