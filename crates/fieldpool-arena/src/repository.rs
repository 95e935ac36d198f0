//! Per-context repository of storages.
//!
//! A [`Repository`] owns exactly one [`Storage`] per parameter declared
//! for its context. Allocation is eager and total: once constructed,
//! every declared parameter resolves, so there is no missing-entry state
//! to handle at lookup time.

use fieldpool_core::{Catalog, ContextId, ParamId, ShapeClass};

use crate::config::GridConfig;
use crate::error::ConfigError;
use crate::storage::Storage;

/// Owner of every storage of one context.
///
/// Repositories, like their storages, cannot be duplicated:
///
/// ```compile_fail
/// fn duplicate(r: &fieldpool_arena::Repository) -> fieldpool_arena::Repository {
///     r.clone()
/// }
/// ```
#[derive(Debug)]
pub struct Repository {
    context: ContextId,
    name: String,
    /// `ParamId(n)` is `storages[n]`.
    storages: Vec<Storage>,
}

impl Repository {
    /// Allocate storages for every parameter `catalog` declares for
    /// `context`.
    ///
    /// Each parameter gets the extents of its declared shape class from
    /// `grid`, so a storage's shape class always matches its declaration.
    /// `grid` is validated first; allocation failure is reported, never
    /// aborts.
    pub fn new(
        catalog: &Catalog,
        context: ContextId,
        grid: &GridConfig,
    ) -> Result<Self, ConfigError> {
        grid.validate()?;
        let spec = catalog
            .context(context)
            .ok_or(ConfigError::UnknownContext { context })?;
        let storages = catalog
            .params(context)
            .map(|(key, param)| Storage::zeroed(key, grid.extents_for(param.shape)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            context,
            name: spec.name.clone(),
            storages,
        })
    }

    /// The context this repository belongs to.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Catalog name of the context.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage of a parameter.
    ///
    /// Always `Some` for a parameter declared for this context.
    pub fn get_storage(&self, param: ParamId) -> Option<&Storage> {
        self.storages.get(param.0 as usize)
    }

    /// Mutable storage of a parameter.
    pub fn get_storage_mut(&mut self, param: ParamId) -> Option<&mut Storage> {
        self.storages.get_mut(param.0 as usize)
    }

    /// Iterate over storages in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Storage> {
        self.storages.iter()
    }

    /// Number of storages.
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    /// Whether the context declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Number of storages of a given shape class.
    pub fn count_by_shape(&self, shape: ShapeClass) -> usize {
        self.storages
            .iter()
            .filter(|s| s.shape_class() == shape)
            .count()
    }

    /// Total memory usage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.storages.iter().map(Storage::memory_bytes).sum()
    }
}
