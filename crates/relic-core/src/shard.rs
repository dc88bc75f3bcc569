//! Shard-table resolution.
//!
//! Pure per call; no shared state. Sharding is opt-in per call: an
//! absent shard key always resolves to the unsharded base table.

use crate::{model::EntityMapping, value::Value};
use std::fmt;

///
/// ShardStrategy
///
/// Maps a logical entity plus a shard-key value to a physical table
/// name, and answers the inverse membership test. Consulted through
/// this trait so hashing/range schemes can be substituted without
/// touching callers.
///

pub trait ShardStrategy: Send + Sync {
    fn shard_table_name(&self, mapping: &EntityMapping, shard_key: Option<&Value>) -> String;

    fn is_sharding_table(&self, mapping: &EntityMapping, candidate: &str) -> bool;
}

impl fmt::Debug for dyn ShardStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShardStrategy")
    }
}

///
/// PrefixShardStrategy
///
/// Default algorithm: physical name is the base table name, a `_`
/// separator if the base does not already end with one, then the
/// stringified shard key. Membership is a case-insensitive prefix
/// match.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct PrefixShardStrategy;

impl PrefixShardStrategy {
    fn prefix(table: &str) -> String {
        if table.ends_with('_') {
            table.to_string()
        } else {
            format!("{table}_")
        }
    }
}

impl ShardStrategy for PrefixShardStrategy {
    fn shard_table_name(&self, mapping: &EntityMapping, shard_key: Option<&Value>) -> String {
        match shard_key {
            Some(key) => format!("{}{key}", Self::prefix(mapping.table())),
            None => mapping.table().to_string(),
        }
    }

    fn is_sharding_table(&self, mapping: &EntityMapping, candidate: &str) -> bool {
        let prefix = Self::prefix(mapping.table());

        // get() rather than slicing: the prefix length may fall inside
        // a multi-byte character of an arbitrary candidate name.
        candidate
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::FieldType,
        registry::{EntityDescriptor, FieldDescriptor, MappingRegistry},
    };

    fn orders_registry() -> MappingRegistry {
        MappingRegistry::build(vec![
            EntityDescriptor::new("order")
                .table("orders")
                .field(FieldDescriptor::new("id", FieldType::Uint))
                .key(["id"])
                .sharded(),
        ])
        .unwrap()
    }

    #[test]
    fn shard_name_is_deterministic() {
        let registry = orders_registry();
        let mapping = registry.get("order").unwrap();
        let strategy = PrefixShardStrategy;

        let key = Value::Text("2024".into());
        assert_eq!(
            strategy.shard_table_name(mapping, Some(&key)),
            "orders_2024"
        );
        assert_eq!(
            strategy.shard_table_name(mapping, Some(&key)),
            "orders_2024"
        );
    }

    #[test]
    fn absent_key_resolves_to_base_table() {
        let registry = orders_registry();
        let mapping = registry.get("order").unwrap();

        assert_eq!(
            PrefixShardStrategy.shard_table_name(mapping, None),
            "orders"
        );
    }

    #[test]
    fn membership_is_prefix_based_and_case_insensitive() {
        let registry = orders_registry();
        let mapping = registry.get("order").unwrap();
        let strategy = PrefixShardStrategy;

        assert!(strategy.is_sharding_table(mapping, "orders_2024"));
        assert!(strategy.is_sharding_table(mapping, "ORDERS_2024"));
        assert!(!strategy.is_sharding_table(mapping, "customers_2024"));
        assert!(!strategy.is_sharding_table(mapping, "orders"));
    }

    #[test]
    fn membership_handles_multibyte_candidates() {
        let registry = orders_registry();
        let mapping = registry.get("order").unwrap();
        let strategy = PrefixShardStrategy;

        // Prefix length lands inside the two-byte 'é'; must not panic.
        assert!(!strategy.is_sharding_table(mapping, "ordersé"));
        assert!(strategy.is_sharding_table(mapping, "orders_é2024"));
        assert!(!strategy.is_sharding_table(mapping, "é"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // A name produced by the strategy is always recognized by
            // the membership test for the same mapping.
            #[test]
            fn generated_names_are_members(
                table in "[a-z][a-z0-9_]{0,12}",
                key in "[a-zA-Z0-9]{1,8}",
            ) {
                let registry = MappingRegistry::build(vec![
                    EntityDescriptor::new("e")
                        .table(table)
                        .field(FieldDescriptor::new("id", FieldType::Uint))
                        .key(["id"])
                        .sharded(),
                ])
                .unwrap();
                let mapping = registry.get("e").unwrap();
                let strategy = PrefixShardStrategy;

                let key = Value::Text(key);
                let name = strategy.shard_table_name(mapping, Some(&key));

                prop_assert!(strategy.is_sharding_table(mapping, &name));
            }
        }
    }

    #[test]
    fn trailing_separator_is_not_doubled() {
        let registry = MappingRegistry::build(vec![
            EntityDescriptor::new("audit")
                .table("audit_")
                .field(FieldDescriptor::new("id", FieldType::Uint))
                .key(["id"])
                .sharded(),
        ])
        .unwrap();
        let mapping = registry.get("audit").unwrap();

        assert_eq!(
            PrefixShardStrategy.shard_table_name(mapping, Some(&Value::Uint(7))),
            "audit_7"
        );
    }
}
