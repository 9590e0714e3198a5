//! Memoized loading
//!
//! [`CachedLoader`] keeps every successfully compiled unit for the lifetime of
//! the loader. Failures are never stored, so the next call for the same key
//! loads again from scratch. Nothing is invalidated when templates change on
//! disk; build a new loader to pick up changes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::assembler::CompiledUnit;
use crate::error::Result;
use crate::loader::Load;

/// Identifies one cached unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Standalone(String),
    InLayout { name: String, layout: String },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Standalone(name) => write!(f, "{}", name),
            CacheKey::InLayout { name, layout } => write!(f, "{}|{}", name, layout),
        }
    }
}

/// Caches successful loads of the wrapped loader
///
/// Safe to share between threads. Two threads missing on the same key may both
/// load it; the first stored unit is the one every caller gets from then on.
pub struct CachedLoader<L> {
    loader: L,
    units: RwLock<HashMap<CacheKey, Arc<CompiledUnit>>>,
}

impl<L: Load> CachedLoader<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            units: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached units
    pub fn len(&self) -> usize {
        self.units.read().map(|units| units.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load every page in `names` standalone, stopping at the first failure
    pub fn preload<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        for name in names {
            self.standalone(name.as_ref())?;
        }
        debug!(count = names.len(), "CachedLoader::preload: done");
        Ok(names.len())
    }

    fn load_or_store(&self, key: CacheKey, load: impl FnOnce() -> Result<Arc<CompiledUnit>>) -> Result<Arc<CompiledUnit>> {
        if let Ok(units) = self.units.read()
            && let Some(unit) = units.get(&key)
        {
            debug!(%key, "CachedLoader: hit");
            return Ok(unit.clone());
        }

        debug!(%key, "CachedLoader: miss");
        let unit = load()?;

        match self.units.write() {
            Ok(mut units) => Ok(units.entry(key).or_insert(unit).clone()),
            Err(_) => Ok(unit),
        }
    }
}

impl<L: Load> Load for CachedLoader<L> {
    fn standalone(&self, name: &str) -> Result<Arc<CompiledUnit>> {
        self.load_or_store(CacheKey::Standalone(name.to_string()), || self.loader.standalone(name))
    }

    fn in_layout(&self, name: &str, layout: &str) -> Result<Arc<CompiledUnit>> {
        let key = CacheKey::InLayout {
            name: name.to_string(),
            layout: layout.to_string(),
        };
        self.load_or_store(key, || self.loader.in_layout(name, layout))
    }
}
