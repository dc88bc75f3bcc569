use crate::shard::{PrefixShardStrategy, ShardStrategy};
use std::{fmt, sync::Arc};

///
/// ShardingConfig
///
/// Attached to an [`super::EntityMapping`] when the entity is declared
/// shardable; consulted only then. The strategy is pluggable so
/// hash/range schemes can replace the default prefix rule without
/// touching callers.
///

#[derive(Clone)]
pub struct ShardingConfig {
    strategy: Arc<dyn ShardStrategy>,
}

impl ShardingConfig {
    #[must_use]
    pub fn new(strategy: Arc<dyn ShardStrategy>) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn ShardStrategy {
        self.strategy.as_ref()
    }
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self {
            strategy: Arc::new(PrefixShardStrategy),
        }
    }
}

impl fmt::Debug for ShardingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardingConfig").finish_non_exhaustive()
    }
}
