use crate::{
    error::{EngineError, QueryError},
    expand,
    filter,
    sql::{Page, SelectRequest, build_select},
};
use relic_core::{
    model::FieldType,
    registry::{EntityDescriptor, FieldDescriptor, MappingRegistry, RelationDescriptor},
    value::Value,
};

fn registry() -> MappingRegistry {
    MappingRegistry::build(vec![
        EntityDescriptor::new("author")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .field(FieldDescriptor::new("name", FieldType::Text))
            .key(["id"]),
        EntityDescriptor::new("book")
            .table("books")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .field(FieldDescriptor::new("title", FieldType::Text))
            .field(FieldDescriptor::new("authorId", FieldType::Uint))
            .key(["id"])
            .relation(RelationDescriptor::to_one("author", "author").join("authorId", "id"))
            .sharded(),
    ])
    .unwrap()
}

fn request<'a>(registry: &'a MappingRegistry, entity: &str) -> SelectRequest<'a> {
    SelectRequest {
        mapping: registry.get(entity).unwrap(),
        filter: None,
        expands: &[],
        order_by: None,
        page: None,
        shard_key: None,
    }
}

#[test]
fn plain_select_lists_every_field() {
    let registry = registry();
    let built = build_select(&registry, request(&registry, "author")).unwrap();

    assert_eq!(
        built.sql,
        "SELECT t0.id AS \"id\", t0.name AS \"name\" FROM author t0"
    );
    assert!(built.params.is_empty());
}

#[test]
fn filter_literals_become_positional_params() {
    let registry = registry();
    let node = filter::parse("title like 'R%' and id gt 10").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.ends_with("WHERE t0.title LIKE ? AND t0.id > ?"));
    assert_eq!(built.params.position(0), Some(&Value::Text("R%".into())));
    assert_eq!(built.params.position(1), Some(&Value::Uint(10)));
}

#[test]
fn grouping_survives_into_sql() {
    let registry = registry();
    let node = filter::parse("(id eq 1 or id eq 2) and title ne 'x'").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let built = build_select(&registry, req).unwrap();

    assert!(
        built
            .sql
            .contains("WHERE (t0.id = ? OR t0.id = ?) AND t0.title <> ?")
    );
}

#[test]
fn joined_field_references_share_one_alias() {
    let registry = registry();
    let node = filter::parse("author.name eq 'ada'").unwrap();
    let expands = expand::parse(Some("author(name)")).unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    req.expands = &expands;
    req.order_by = Some("author.name desc");
    let built = build_select(&registry, req).unwrap();

    // Same relation referenced by expand, filter, and order-by: one join.
    assert_eq!(built.sql.matches("JOIN").count(), 1);
    assert!(built.sql.contains("JOIN author t1 ON t1.id = t0.author_id"));
    assert!(built.sql.contains("t1.name AS \"author.name\""));
    assert!(built.sql.contains("WHERE t1.name = ?"));
    assert!(built.sql.ends_with("ORDER BY t1.name DESC"));
}

#[test]
fn join_conditions_use_physical_columns() {
    let registry = MappingRegistry::build(vec![
        EntityDescriptor::new("author")
            .field(FieldDescriptor::new("id", FieldType::Uint).column("author_pk"))
            .key(["id"]),
        EntityDescriptor::new("book")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .field(FieldDescriptor::new("authorId", FieldType::Uint).column("author_fk"))
            .key(["id"])
            .relation(RelationDescriptor::to_one("author", "author").join("authorId", "id")),
    ])
    .unwrap();

    let expands = expand::parse(Some("author")).unwrap();
    let mut req = request(&registry, "book");
    req.expands = &expands;
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.contains("JOIN author t1 ON t1.author_pk = t0.author_fk"));
}

#[test]
fn optional_relations_left_join() {
    let registry = MappingRegistry::build(vec![
        EntityDescriptor::new("publisher")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .key(["id"]),
        EntityDescriptor::new("book")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .field(FieldDescriptor::new("publisherId", FieldType::Uint).nullable())
            .key(["id"])
            .relation(
                RelationDescriptor::to_one("publisher", "publisher")
                    .join("publisherId", "id")
                    .optional(relic_core::model::CascadeAction::SetNull),
            ),
    ])
    .unwrap();

    let expands = expand::parse(Some("publisher")).unwrap();
    let mut req = request(&registry, "book");
    req.expands = &expands;
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.contains("LEFT JOIN publisher t1"));
}

#[test]
fn shard_key_substitutes_physical_tables() {
    let registry = registry();
    let key = Value::Text("2024".into());

    let mut req = request(&registry, "book");
    req.shard_key = Some(&key);
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.contains("FROM books_2024 t0"));
}

#[test]
fn unsharded_entities_ignore_the_shard_key() {
    let registry = registry();
    let key = Value::Text("2024".into());

    let mut req = request(&registry, "author");
    req.shard_key = Some(&key);
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.contains("FROM author t0"));
}

#[test]
fn joined_shardable_entities_substitute_too() {
    let registry = MappingRegistry::build(vec![
        EntityDescriptor::new("tenant")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .key(["id"])
            .sharded(),
        EntityDescriptor::new("order")
            .table("orders")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .field(FieldDescriptor::new("tenantId", FieldType::Uint))
            .key(["id"])
            .relation(RelationDescriptor::to_one("tenant", "tenant").join("tenantId", "id"))
            .sharded(),
    ])
    .unwrap();

    let key = Value::Uint(7);
    let expands = expand::parse(Some("tenant")).unwrap();
    let mut req = request(&registry, "order");
    req.expands = &expands;
    req.shard_key = Some(&key);
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.contains("FROM orders_7 t0"));
    assert!(built.sql.contains("JOIN tenant_7 t1"));
}

#[test]
fn in_lists_expand_to_one_placeholder_per_item() {
    let registry = registry();
    let node = filter::parse("id in '1, 2, 3'").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.contains("t0.id IN (?, ?, ?)"));
    assert_eq!(built.params.len(), 3);
    assert_eq!(built.params.position(2), Some(&Value::Uint(3)));
}

#[test]
fn null_equality_renders_is_null() {
    let registry = registry();
    let node = filter::parse("authorId eq null and title ne null").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let built = build_select(&registry, req).unwrap();

    assert!(
        built
            .sql
            .contains("WHERE t0.author_id IS NULL AND t0.title IS NOT NULL")
    );
    assert!(built.params.is_empty());
}

#[test]
fn paging_appends_limit_and_offset() {
    let registry = registry();

    let mut req = request(&registry, "author");
    req.page = Some(Page::new(25, 50));
    let built = build_select(&registry, req).unwrap();

    assert!(built.sql.ends_with("LIMIT 25 OFFSET 50"));
}

// ---- failure modes -----------------------------------------------------

#[test]
fn unknown_field_is_reported_with_entity() {
    let registry = registry();
    let node = filter::parse("missing eq 1").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let err = build_select(&registry, req).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Query(QueryError::UnknownField { entity, field })
            if entity == "book" && field == "missing"
    ));
}

#[test]
fn two_hop_paths_are_unsupported() {
    let registry = registry();
    let node = filter::parse("author.publisher.name eq x").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let err = build_select(&registry, req).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Query(QueryError::UnsupportedExpand { .. })
    ));
}

#[test]
fn expand_of_a_non_relation_is_unknown() {
    let registry = registry();
    let expands = expand::parse(Some("title")).unwrap();

    let mut req = request(&registry, "book");
    req.expands = &expands;
    let err = build_select(&registry, req).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Query(QueryError::UnknownField { .. })
    ));
}

#[test]
fn mistyped_literal_is_rejected() {
    let registry = registry();
    let node = filter::parse("id eq abc").unwrap();

    let mut req = request(&registry, "book");
    req.filter = Some(&node);
    let err = build_select(&registry, req).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Query(QueryError::InvalidLiteral { .. })
    ));
}

#[test]
fn hostile_order_by_propagates_validation_error() {
    let registry = registry();

    let mut req = request(&registry, "book");
    req.order_by = Some("title; drop table books");
    let err = build_select(&registry, req).unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
}
