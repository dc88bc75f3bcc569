//! Query execution front door.
//!
//! [`QueryExecutor`] owns the mapping registry and a backend handle,
//! turns caller options into one generated SELECT per call, and
//! materializes backend rows into records, running field codecs on the
//! way out. Statement generation is cached; execution never is.

mod command;


pub use command::{CommandStore, StaticCommands};

use crate::{
    backend::{Row, SqlBackend},
    error::{EngineError, QueryError},
    expand, filter,
    sql::{BuiltSelect, Page, SelectColumn, SelectRequest, build_select},
};
use command::StatementCache;
use derive_more::{Deref, IntoIterator};
use relic_core::{
    model::EntityMapping,
    params::{ParamBag, ParamError, ParamInput, resolve_key_params, to_param_bag},
    registry::MappingRegistry,
    value::Value,
};
use std::{collections::BTreeMap, fmt::Write, sync::Arc};

///
/// QueryOptions
///
/// Everything a caller can say about one query. All parts are textual;
/// parsing happens inside the executor so callers stay decoupled from
/// the AST types.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryOptions {
    pub filter: Option<String>,
    pub expand: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<Page>,
}

impl QueryOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: None,
            expand: None,
            order_by: None,
            page: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, text: impl Into<String>) -> Self {
        self.filter = Some(text.into());
        self
    }

    #[must_use]
    pub fn expand(mut self, text: impl Into<String>) -> Self {
        self.expand = Some(text.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, text: impl Into<String>) -> Self {
        self.order_by = Some(text.into());
        self
    }

    #[must_use]
    pub const fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }
}

///
/// QueryContext
///
/// Per-call ambient state. Carried explicitly rather than through
/// thread-local storage so concurrent callers cannot observe each
/// other's shard.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryContext {
    pub shard_key: Option<Value>,
}

impl QueryContext {
    #[must_use]
    pub const fn new() -> Self {
        Self { shard_key: None }
    }

    #[must_use]
    pub fn sharded(key: impl Into<Value>) -> Self {
        Self {
            shard_key: Some(key.into()),
        }
    }
}

///
/// RecordRow
///
/// One materialized result record. Base fields keep their field name;
/// expanded fields are keyed `relation.field`. Codec-backed fields hold
/// the decoded value.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
pub struct RecordRow {
    #[deref]
    #[into_iterator]
    fields: BTreeMap<String, Value>,
}

impl RecordRow {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.fields.get(label)
    }
}

impl FromIterator<(String, Value)> for RecordRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

///
/// QueryExecutor
///

pub struct QueryExecutor<B> {
    registry: Arc<MappingRegistry>,
    backend: B,
    commands: Option<Arc<dyn CommandStore>>,
    cache: StatementCache,
}

impl<B: SqlBackend> QueryExecutor<B> {
    #[must_use]
    pub fn new(registry: Arc<MappingRegistry>, backend: B) -> Self {
        Self {
            registry,
            backend,
            commands: None,
            cache: StatementCache::default(),
        }
    }

    #[must_use]
    pub fn with_commands(mut self, commands: Arc<dyn CommandStore>) -> Self {
        self.commands = Some(commands);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    /// Run one generated SELECT and materialize every row.
    ///
    /// Exactly one backend statement per call regardless of how many
    /// relations the filter and expand list touch.
    pub fn query(
        &self,
        entity: &str,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> Result<Vec<RecordRow>, EngineError> {
        let mapping = self.mapping(entity)?;
        let built = self.generate(mapping, options, ctx)?;

        let rows = self.backend.select(&built.sql, &built.params)?;

        rows.into_iter()
            .map(|row| self.materialize(&built.columns, row))
            .collect()
    }

    /// Look up one record by primary key.
    ///
    /// Accepts any key shape the parameter strategy resolves: a scalar
    /// for single-field keys, a map, a positional array matching the
    /// key arity, or a record of the same entity.
    pub fn find<'a>(
        &self,
        entity: &str,
        key: impl Into<ParamInput<'a>>,
        ctx: &QueryContext,
    ) -> Result<Option<RecordRow>, EngineError> {
        let mapping = self.mapping(entity)?;
        let bag = resolve_key_params(mapping, key.into())?;

        let base = build_select(
            &self.registry,
            SelectRequest {
                mapping,
                filter: None,
                expands: &[],
                order_by: None,
                page: None,
                shard_key: ctx.shard_key.as_ref(),
            },
        )?;

        let mut sql = base.sql;
        let mut params = Vec::with_capacity(mapping.key_len());
        for (index, field) in mapping.key_fields().enumerate() {
            let value = bag.get(&field.name).ok_or_else(|| {
                ParamError::Invalid(format!("missing key field '{}'", field.name))
            })?;
            let connector = if index == 0 { " WHERE" } else { " AND" };
            let _ = write!(sql, "{connector} t0.{} = ?", field.column);
            params.push(value.clone());
        }

        let rows = self
            .backend
            .select(&sql, &ParamBag::positional(params))?;

        rows.into_iter()
            .next()
            .map(|row| self.materialize(&base.columns, row))
            .transpose()
    }

    /// Run a pre-authored statement from the command store.
    ///
    /// The SQL is used verbatim; only parameter binding happens here,
    /// so the rows come back unmapped.
    pub fn command<'a>(
        &self,
        key: &str,
        params: impl Into<ParamInput<'a>>,
    ) -> Result<Vec<Row>, EngineError> {
        let sql = self
            .commands
            .as_ref()
            .and_then(|store| store.sql_for(key))
            .ok_or_else(|| QueryError::UnknownCommand(key.to_string()))?;

        let bag = to_param_bag(params.into())?;

        Ok(self.backend.select(&sql, &bag)?)
    }

    fn mapping(&self, entity: &str) -> Result<&EntityMapping, QueryError> {
        self.registry
            .get(entity)
            .ok_or_else(|| QueryError::UnknownEntity(entity.to_string()))
    }

    fn generate(
        &self,
        mapping: &EntityMapping,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> Result<Arc<BuiltSelect>, EngineError> {
        let key = statement_key(mapping.name(), options, ctx);

        self.cache.get_or_build(&key, || {
            let filter = options
                .filter
                .as_deref()
                .map(filter::parse)
                .transpose()?;
            let expands = expand::parse(options.expand.as_deref())?;

            build_select(
                &self.registry,
                SelectRequest {
                    mapping,
                    filter: filter.as_ref(),
                    expands: &expands,
                    order_by: options.order_by.as_deref(),
                    page: options.page,
                    shard_key: ctx.shard_key.as_ref(),
                },
            )
        })
    }

    fn materialize(&self, columns: &[SelectColumn], row: Row) -> Result<RecordRow, EngineError> {
        let mut fields = BTreeMap::new();

        for column in columns {
            // Backends may omit cells (left-joined expands with no
            // match typically return NULL instead, but both work).
            let Some(value) = row.get(&column.label) else {
                continue;
            };
            fields.insert(column.label.clone(), self.decode(column, value.clone())?);
        }

        Ok(RecordRow { fields })
    }

    // Run the owning field's codec, if any, on a raw cell value.
    fn decode(&self, column: &SelectColumn, value: Value) -> Result<Value, EngineError> {
        let codec = self
            .registry
            .get(&column.entity)
            .and_then(|mapping| mapping.field(&column.field))
            .and_then(|field| field.codec.as_ref());

        match codec {
            Some(codec) if !value.is_null() => Ok(codec.decode(value)?),
            _ => Ok(value),
        }
    }
}

// The full request text pins the generated statement, so equal requests
// share one compilation.
fn statement_key(entity: &str, options: &QueryOptions, ctx: &QueryContext) -> String {
    format!(
        "{entity}\u{1}{}\u{1}{}\u{1}{}\u{1}{:?}\u{1}{:?}",
        options.filter.as_deref().unwrap_or_default(),
        options.expand.as_deref().unwrap_or_default(),
        options.order_by.as_deref().unwrap_or_default(),
        options.page,
        ctx.shard_key,
    )
}
