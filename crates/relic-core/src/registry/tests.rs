use crate::{
    error::MappingError,
    model::{CascadeAction, FieldType},
    registry::{EntityDescriptor, FieldDescriptor, MappingRegistry, RelationDescriptor},
};

fn author() -> EntityDescriptor {
    EntityDescriptor::new("author")
        .field(FieldDescriptor::new("id", FieldType::Uint))
        .field(FieldDescriptor::new("name", FieldType::Text))
        .key(["id"])
}

fn book() -> EntityDescriptor {
    EntityDescriptor::new("book")
        .field(FieldDescriptor::new("id", FieldType::Uint))
        .field(FieldDescriptor::new("authorId", FieldType::Uint))
        .field(FieldDescriptor::new("title", FieldType::Text))
        .key(["id"])
        .relation(RelationDescriptor::to_one("author", "author").join("authorId", "id"))
}

#[test]
fn mutual_references_resolve_in_second_pass() {
    // author -> book is declared before book exists; the two-pass build
    // must accept it.
    let registry = MappingRegistry::build(vec![
        author().relation(RelationDescriptor::to_many("books", "book").join("id", "authorId")),
        book(),
    ])
    .unwrap();

    assert_eq!(registry.len(), 2);
    let author = registry.get("author").unwrap();
    assert_eq!(author.relation("books").unwrap().target, "book");
}

#[test]
fn duplicate_entity_is_fatal() {
    let err = MappingRegistry::build(vec![author(), author()]).unwrap_err();

    assert_eq!(err, MappingError::DuplicateEntity("author".into()));
}

#[test]
fn unresolved_relation_target_is_fatal() {
    let err = MappingRegistry::build(vec![book()]).unwrap_err();

    assert!(matches!(
        err,
        MappingError::UnresolvedRelationTarget { target, .. } if target == "author"
    ));
}

#[test]
fn key_fields_must_be_declared() {
    let err = MappingRegistry::build(vec![
        EntityDescriptor::new("tag")
            .field(FieldDescriptor::new("id", FieldType::Uint))
            .key(["label"]),
    ])
    .unwrap_err();

    assert!(matches!(
        err,
        MappingError::UnknownKeyField { field, .. } if field == "label"
    ));
}

#[test]
fn key_is_mandatory() {
    let err = MappingRegistry::build(vec![
        EntityDescriptor::new("tag").field(FieldDescriptor::new("id", FieldType::Uint)),
    ])
    .unwrap_err();

    assert!(matches!(err, MappingError::MissingKey { .. }));
}

#[test]
fn required_relation_must_cascade_delete() {
    let mut descriptor = book();
    descriptor.relations[0].cascade = CascadeAction::SetNull;

    let err = MappingRegistry::build(vec![author(), descriptor]).unwrap_err();

    assert!(matches!(err, MappingError::InvalidCascade { .. }));
}

#[test]
fn optional_relation_may_set_null_or_filter() {
    let publisher = EntityDescriptor::new("publisher")
        .field(FieldDescriptor::new("id", FieldType::Uint))
        .key(["id"]);

    let mut descriptor = book();
    descriptor.fields.push(FieldDescriptor::new(
        "publisherId",
        FieldType::Uint,
    ));
    descriptor = descriptor.relation(
        RelationDescriptor::to_one("publisher", "publisher")
            .join("publisherId", "id")
            .optional(CascadeAction::SetNull),
    );

    MappingRegistry::build(vec![author(), publisher, descriptor]).unwrap();
}

#[test]
fn join_fields_must_exist_on_both_sides() {
    let bad_local = EntityDescriptor::new("book")
        .field(FieldDescriptor::new("id", FieldType::Uint))
        .key(["id"])
        .relation(RelationDescriptor::to_one("author", "author").join("missing", "id"));

    let err = MappingRegistry::build(vec![author(), bad_local]).unwrap_err();
    assert!(matches!(
        err,
        MappingError::UnknownJoinField { side: "the local entity", .. }
    ));

    let bad_target = EntityDescriptor::new("book")
        .field(FieldDescriptor::new("id", FieldType::Uint))
        .field(FieldDescriptor::new("authorId", FieldType::Uint))
        .key(["id"])
        .relation(RelationDescriptor::to_one("author", "author").join("authorId", "missing"));

    let err = MappingRegistry::build(vec![author(), bad_target]).unwrap_err();
    assert!(matches!(
        err,
        MappingError::UnknownJoinField { side: "the target entity", .. }
    ));
}

#[test]
fn names_default_to_snake_case() {
    let registry = MappingRegistry::build(vec![
        EntityDescriptor::new("OrderLine")
            .field(FieldDescriptor::new("orderId", FieldType::Uint))
            .key(["orderId"]),
    ])
    .unwrap();

    let mapping = registry.get("OrderLine").unwrap();
    assert_eq!(mapping.table(), "order_line");
    assert_eq!(mapping.field("orderId").unwrap().column, "order_id");
}

#[test]
fn explicit_names_win_over_derived_ones() {
    let registry = MappingRegistry::build(vec![
        EntityDescriptor::new("order")
            .table("tbl_orders")
            .field(FieldDescriptor::new("id", FieldType::Uint).column("order_pk"))
            .key(["id"]),
    ])
    .unwrap();

    let mapping = registry.get("order").unwrap();
    assert_eq!(mapping.table(), "tbl_orders");
    assert_eq!(mapping.field("id").unwrap().column, "order_pk");
}

#[test]
fn key_order_is_stable() {
    let registry = MappingRegistry::build(vec![
        EntityDescriptor::new("line")
            .field(FieldDescriptor::new("lineNo", FieldType::Uint))
            .field(FieldDescriptor::new("orderId", FieldType::Uint))
            .key(["orderId", "lineNo"]),
    ])
    .unwrap();

    let mapping = registry.get("line").unwrap();
    let key: Vec<&str> = mapping.key_fields().map(|f| f.name.as_str()).collect();
    assert_eq!(key, ["orderId", "lineNo"]);
}
