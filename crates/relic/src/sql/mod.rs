//! Parameterized SELECT generation.
//!
//! Composes the mapping model, filter AST, expansion list, and
//! validated order-by fragments into one SQL statement plus a
//! positional parameter bag. Field references resolve through
//! relations to join aliases; one alias per relation, reused on every
//! reference, so the same relation never joins twice.

#[cfg(test)]
mod tests;

use crate::{
    error::{EngineError, QueryError},
    expand::Expand,
    filter::{CompareOp, Comparison, FilterNode, FilterValue},
    fragment,
};
use relic_core::{
    model::{EntityMapping, FieldMapping, FieldType, RelationMapping},
    params::ParamBag,
    registry::MappingRegistry,
    value::Value,
};
use std::fmt::Write;

///
/// Page
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

///
/// SelectColumn
///
/// One select-list entry. The label doubles as the SQL column alias
/// and the key under which the cell lands in a materialized record;
/// expanded fields are labeled `relation.field`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectColumn {
    pub label: String,
    /// Entity that owns the field (base entity or a relation target).
    pub entity: String,
    pub field: String,
}

///
/// BuiltSelect
///

#[derive(Clone, Debug, PartialEq)]
pub struct BuiltSelect {
    pub sql: String,
    pub params: ParamBag,
    pub columns: Vec<SelectColumn>,
}

///
/// SelectRequest
///

#[derive(Clone, Copy, Debug)]
pub struct SelectRequest<'a> {
    pub mapping: &'a EntityMapping,
    pub filter: Option<&'a FilterNode>,
    pub expands: &'a [Expand],
    pub order_by: Option<&'a str>,
    pub page: Option<Page>,
    /// Shard key from the caller's context; substitutes physical table
    /// names for every shardable entity in the statement.
    pub shard_key: Option<&'a Value>,
}

/// Build one parameterized SELECT for the request.
pub fn build_select(
    registry: &MappingRegistry,
    request: SelectRequest<'_>,
) -> Result<BuiltSelect, EngineError> {
    let mut joins = JoinState::new(registry, request.mapping);

    // Resolve expands first so their joins take the early aliases and
    // the select list is stable.
    let mut columns = Vec::new();
    let mut select_items = Vec::new();

    for field in request.mapping.fields() {
        select_items.push(format!("t0.{} AS \"{}\"", field.column, field.name));
        columns.push(SelectColumn {
            label: field.name.clone(),
            entity: request.mapping.name().to_string(),
            field: field.name.clone(),
        });
    }

    for expand in request.expands {
        let slot = joins.ensure_join(&expand.name)?;
        let (alias, target) = (slot.alias.clone(), slot.target);

        let fields = expand_fields(request.mapping, target, expand)?;
        for field in fields {
            let label = format!("{}.{}", expand.name, field.name);
            select_items.push(format!("{alias}.{} AS \"{label}\"", field.column));
            columns.push(SelectColumn {
                label,
                entity: target.name().to_string(),
                field: field.name.clone(),
            });
        }
    }

    // WHERE before ORDER BY: filter references may introduce joins the
    // order-by then reuses.
    let mut params = Vec::new();
    let where_sql = match request.filter {
        Some(node) => Some(where_clause(node, &mut joins, &mut params)?),
        None => None,
    };

    let order_sql = match request.order_by {
        Some(fragment_text) => {
            let terms = fragment::parse_order_by(fragment_text)?;
            let mut rendered = Vec::with_capacity(terms.len());
            for term in terms {
                let (alias, field) = joins.resolve_field(&term.field)?;
                let direction = if term.descending { "DESC" } else { "ASC" };
                rendered.push(format!("{alias}.{} {direction}", field.column));
            }
            (!rendered.is_empty()).then(|| rendered.join(", "))
        }
        None => None,
    };

    let mut sql = format!(
        "SELECT {} FROM {} t0",
        select_items.join(", "),
        joins.base_table(request.shard_key)
    );

    for slot in &joins.joins {
        let keyword = if slot.relation.optional {
            "LEFT JOIN"
        } else {
            "JOIN"
        };
        let table = physical_table(slot.target, request.shard_key);
        let on = slot
            .relation
            .join
            .iter()
            .map(|pair| {
                let target_col = column_of(slot.target, &pair.target);
                let local_col = column_of(joins.base, &pair.local);
                format!("{}.{target_col} = t0.{local_col}", slot.alias)
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        let _ = write!(sql, " {keyword} {table} {} ON {on}", slot.alias);
    }

    if let Some(where_sql) = where_sql {
        let _ = write!(sql, " WHERE {where_sql}");
    }
    if let Some(order_sql) = order_sql {
        let _ = write!(sql, " ORDER BY {order_sql}");
    }
    if let Some(page) = request.page {
        let _ = write!(sql, " LIMIT {} OFFSET {}", page.limit, page.offset);
    }

    Ok(BuiltSelect {
        sql,
        params: ParamBag::positional(params),
        columns,
    })
}

// Field list an expand contributes: the verbatim select text re-parsed
// against the target entity, or every target field when absent.
fn expand_fields<'a>(
    base: &EntityMapping,
    target: &'a EntityMapping,
    expand: &Expand,
) -> Result<Vec<&'a FieldMapping>, QueryError> {
    let Some(select) = &expand.select else {
        return Ok(target.fields().iter().collect());
    };

    let mut fields = Vec::new();
    for name in select.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let field = target.field(name).ok_or_else(|| QueryError::UnknownField {
            entity: target.name().to_string(),
            field: name.to_string(),
        })?;
        fields.push(field);
    }

    if fields.is_empty() {
        return Err(QueryError::UnsupportedExpand {
            entity: base.name().to_string(),
            path: expand.name.clone(),
            reason: "empty field selection".to_string(),
        });
    }

    Ok(fields)
}

fn where_clause(
    node: &FilterNode,
    joins: &mut JoinState<'_>,
    params: &mut Vec<Value>,
) -> Result<String, EngineError> {
    match node {
        FilterNode::Comparison(comparison) => comparison_sql(comparison, joins, params),
        FilterNode::And(l, r) => Ok(format!(
            "{} AND {}",
            where_clause(l, joins, params)?,
            where_clause(r, joins, params)?
        )),
        FilterNode::Or(l, r) => Ok(format!(
            "{} OR {}",
            where_clause(l, joins, params)?,
            where_clause(r, joins, params)?
        )),
        FilterNode::Group(inner) => Ok(format!("({})", where_clause(inner, joins, params)?)),
    }
}

fn comparison_sql(
    comparison: &Comparison,
    joins: &mut JoinState<'_>,
    params: &mut Vec<Value>,
) -> Result<String, EngineError> {
    let (alias, field) = joins.resolve_field(&comparison.field)?;
    let column = format!("{alias}.{}", field.column);

    if comparison.op == CompareOp::In {
        let values = in_values(field, &comparison.value)?;
        if values.is_empty() {
            return Err(invalid_literal(field, comparison.value.raw()).into());
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        params.extend(values);
        return Ok(format!("{column} IN ({placeholders})"));
    }

    let value = coerce_literal(field, &comparison.value)?;

    // NULL comparisons cannot bind a parameter.
    if value.is_null() {
        return match comparison.op {
            CompareOp::Eq => Ok(format!("{column} IS NULL")),
            CompareOp::Ne => Ok(format!("{column} IS NOT NULL")),
            _ => Err(QueryError::InvalidLiteral {
                field: field.name.clone(),
                literal: comparison.value.raw().to_string(),
                ty: field.ty.to_string(),
            }
            .into()),
        };
    }

    params.push(value);

    let op = match comparison.op {
        CompareOp::Eq => "=",
        CompareOp::Ne => "<>",
        CompareOp::Gt => ">",
        CompareOp::Ge => ">=",
        CompareOp::Lt => "<",
        CompareOp::Le => "<=",
        CompareOp::Like => "LIKE",
        CompareOp::In => unreachable!("handled above"),
    };

    Ok(format!("{column} {op} ?"))
}

// `in` accepts a single token or a quoted comma-separated list; each
// item coerces against the column type.
fn in_values(field: &FieldMapping, value: &FilterValue) -> Result<Vec<Value>, EngineError> {
    let items: Vec<&str> = match value {
        FilterValue::Quoted(list) if list.contains(',') => {
            list.split(',').map(str::trim).collect()
        }
        other => vec![other.raw()],
    };

    items
        .into_iter()
        .filter(|item| !item.is_empty())
        .map(|item| {
            field
                .ty
                .parse_literal(item)
                .ok_or_else(|| invalid_literal(field, item).into())
        })
        .collect()
}

fn coerce_literal(field: &FieldMapping, value: &FilterValue) -> Result<Value, EngineError> {
    match value {
        // Quoted text binds verbatim on text-like columns; elsewhere it
        // still must fit the column type.
        FilterValue::Quoted(s) if matches!(field.ty, FieldType::Text | FieldType::Json) => {
            Ok(Value::Text(s.clone()))
        }
        other => field
            .ty
            .parse_literal(other.raw())
            .ok_or_else(|| invalid_literal(field, other.raw()).into()),
    }
}

fn invalid_literal(field: &FieldMapping, literal: &str) -> QueryError {
    QueryError::InvalidLiteral {
        field: field.name.clone(),
        literal: literal.to_string(),
        ty: field.ty.to_string(),
    }
}

fn physical_table(mapping: &EntityMapping, shard_key: Option<&Value>) -> String {
    match (mapping.sharding(), shard_key) {
        (Some(config), Some(key)) => config.strategy().shard_table_name(mapping, Some(key)),
        _ => mapping.table().to_string(),
    }
}

fn column_of<'a>(mapping: &'a EntityMapping, field: &'a str) -> &'a str {
    mapping
        .field(field)
        .map_or(field, |f| f.column.as_str())
}

///
/// JoinState
///
/// Alias bookkeeping: `t0` is the base entity; each distinct relation
/// gets the next `tN` the first time it is referenced.
///

struct JoinState<'a> {
    registry: &'a MappingRegistry,
    base: &'a EntityMapping,
    joins: Vec<JoinSlot<'a>>,
}

struct JoinSlot<'a> {
    relation: &'a RelationMapping,
    target: &'a EntityMapping,
    alias: String,
}

impl<'a> JoinState<'a> {
    const fn new(registry: &'a MappingRegistry, base: &'a EntityMapping) -> Self {
        Self {
            registry,
            base,
            joins: Vec::new(),
        }
    }

    fn base_table(&self, shard_key: Option<&Value>) -> String {
        physical_table(self.base, shard_key)
    }

    // One alias per relation path; repeated references reuse it.
    fn ensure_join(&mut self, relation_name: &str) -> Result<&JoinSlot<'a>, QueryError> {
        if let Some(index) = self
            .joins
            .iter()
            .position(|slot| slot.relation.name == relation_name)
        {
            return Ok(&self.joins[index]);
        }

        let relation = self.base.relation(relation_name).ok_or_else(|| {
            QueryError::UnknownField {
                entity: self.base.name().to_string(),
                field: relation_name.to_string(),
            }
        })?;

        let target = self.registry.get(&relation.target).ok_or_else(|| {
            // The registry build guarantees resolvability; this guards
            // against a mapping borrowed from a different registry.
            QueryError::UnknownEntity(relation.target.clone())
        })?;

        let index = self.joins.len();
        self.joins.push(JoinSlot {
            relation,
            target,
            alias: format!("t{}", index + 1),
        });

        Ok(&self.joins[index])
    }

    // Resolve `field` or `relation.field` to an alias/column pair.
    fn resolve_field(&mut self, path: &str) -> Result<(String, &'a FieldMapping), QueryError> {
        match path.split_once('.') {
            None => {
                let field =
                    self.base
                        .field(path)
                        .ok_or_else(|| QueryError::UnknownField {
                            entity: self.base.name().to_string(),
                            field: path.to_string(),
                        })?;

                Ok(("t0".to_string(), field))
            }
            Some((relation_name, rest)) => {
                if rest.contains('.') {
                    return Err(QueryError::UnsupportedExpand {
                        entity: self.base.name().to_string(),
                        path: path.to_string(),
                        reason: "relation paths longer than one hop are not supported"
                            .to_string(),
                    });
                }

                let slot = self.ensure_join(relation_name)?;
                let field =
                    slot.target
                        .field(rest)
                        .ok_or_else(|| QueryError::UnknownField {
                            entity: slot.target.name().to_string(),
                            field: rest.to_string(),
                        })?;

                Ok((slot.alias.clone(), field))
            }
        }
    }
}
