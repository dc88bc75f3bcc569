//! Pre-authored statements and the compiled-statement cache.

use crate::{error::EngineError, sql::BuiltSelect};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError},
};

///
/// CommandStore
///
/// Named SQL statements authored outside the engine. A command bypasses
/// generation entirely; the engine only binds parameters and runs it.
///

pub trait CommandStore: Send + Sync {
    fn sql_for(&self, key: &str) -> Option<String>;
}

///
/// StaticCommands
///
/// In-memory command store over a fixed map.
///

#[derive(Clone, Debug, Default)]
pub struct StaticCommands {
    statements: BTreeMap<String, String>,
}

impl StaticCommands {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statements: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, sql: impl Into<String>) -> Self {
        self.statements.insert(key.into(), sql.into());
        self
    }
}

impl CommandStore for StaticCommands {
    fn sql_for(&self, key: &str) -> Option<String> {
        self.statements.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for StaticCommands {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

///
/// StatementCache
///
/// Generated statements keyed by their full request text. The build
/// closure runs under the lock, so each key compiles at most once even
/// under concurrent first use.
///

#[derive(Debug, Default)]
pub(crate) struct StatementCache {
    inner: Mutex<HashMap<String, Arc<BuiltSelect>>>,
}

impl StatementCache {
    pub fn get_or_build<F>(&self, key: &str, build: F) -> Result<Arc<BuiltSelect>, EngineError>
    where
        F: FnOnce() -> Result<BuiltSelect, EngineError>,
    {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(built) = cache.get(key) {
            return Ok(Arc::clone(built));
        }

        let built = Arc::new(build()?);
        cache.insert(key.to_string(), Arc::clone(&built));

        Ok(built)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
