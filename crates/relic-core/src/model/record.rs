use crate::value::Value;

///
/// Record
///
/// Host-record seam. Entity instances expose their field values through
/// this trait instead of runtime reflection; implementations are
/// hand-written or generated alongside the entity descriptors, so the
/// accessor table is fixed at mapping-build time.
///

pub trait Record {
    /// Entity name this record belongs to, matching the registry.
    fn entity_name(&self) -> &str;

    /// Field names this record can produce, in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Read one field by name. `None` means the field does not exist on
    /// this record (distinct from a present `Value::Null`).
    fn get(&self, field: &str) -> Option<Value>;
}
