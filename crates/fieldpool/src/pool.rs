//! The [`FieldPool`] registry.

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use fieldpool_arena::{ConfigError, Repository, Storage, StorageRef};
use fieldpool_core::{Catalog, ContextDecl, ContextId, ParamKey, PlaceholderId, PoolError};

use crate::active::ActiveContextSet;
use crate::config::PoolConfig;
use crate::placeholder::{BindingTable, Placeholder, PlaceholderMap};

/// The process-wide authority over field storage.
///
/// Construct one at start-up and pass it to every component that needs
/// field access. All storages are allocated by [`FieldPool::new`] and
/// live as long as the pool.
///
/// # Access rules
///
/// - [`get_storage`](Self::get_storage) succeeds only while the key's
///   context is active.
/// - [`get_placeholder`](Self::get_placeholder) always succeeds for a
///   declared pair, whatever the activation state.
/// - [`resolve`](Self::resolve) follows a placeholder's binding and is
///   gated on the context that owns the *bound* storage.
#[derive(Debug)]
pub struct FieldPool {
    catalog: Catalog,
    /// `ContextId(n)` is `repositories[n]`.
    repositories: Vec<Repository>,
    active: ActiveContextSet,
    placeholders: PlaceholderMap,
    bindings: BindingTable,
}

impl FieldPool {
    /// Validate `config` and allocate every storage.
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.grid.validate()?;
        let catalog = Catalog::from_specs(config.contexts)?;

        let repositories = catalog
            .contexts()
            .map(|(id, _)| Repository::new(&catalog, id, &config.grid))
            .collect::<Result<Vec<_>, _>>()?;

        let placeholders = PlaceholderMap::build(&catalog);
        // Repository and placeholder order are both declaration order, so
        // the flattened storages line up with placeholder ids.
        let initial: Vec<StorageRef> = repositories
            .iter()
            .flat_map(|r| r.iter().map(Storage::storage_ref))
            .collect();
        debug_assert_eq!(initial.len(), placeholders.len());
        let bindings = BindingTable::new(initial);

        let pool = Self {
            active: ActiveContextSet::new(catalog.len()),
            catalog,
            repositories,
            placeholders,
            bindings,
        };
        info!(
            contexts = pool.catalog.len(),
            placeholders = pool.placeholders.len(),
            bytes = pool.memory_bytes(),
            "field pool allocated"
        );
        Ok(pool)
    }

    /// Build a pool for a static declaration table on the default grid.
    pub fn from_decls(decls: &[ContextDecl]) -> Result<Self, ConfigError> {
        Self::new(PoolConfig::from_decls(decls))
    }

    fn repository_of(&self, context: ContextId) -> Result<&Repository, PoolError> {
        self.repositories
            .get(context.0 as usize)
            .ok_or(PoolError::UnknownContext { context })
    }

    /// Enter a context. Idempotent.
    pub fn activate(&mut self, context: ContextId) -> Result<(), PoolError> {
        self.repository_of(context)?;
        if self.active.activate(context) {
            debug!(context = %self.repositories[context.0 as usize].name(), "context activated");
        }
        Ok(())
    }

    /// Leave a context. Idempotent.
    ///
    /// There is no nesting count: one `deactivate` closes the context no
    /// matter how many times it was activated. Use [`enter`](Self::enter)
    /// for scopes that nest.
    pub fn deactivate(&mut self, context: ContextId) -> Result<(), PoolError> {
        self.repository_of(context)?;
        if self.active.deactivate(context) {
            debug!(context = %self.repositories[context.0 as usize].name(), "context deactivated");
        }
        Ok(())
    }

    /// Whether a context is active.
    pub fn is_active(&self, context: ContextId) -> bool {
        self.active.is_active(context)
    }

    /// Currently active contexts in id order.
    pub fn active_contexts(&self) -> SmallVec<[ContextId; 4]> {
        self.active.active()
    }

    /// Activate a context for the lifetime of the returned scope.
    ///
    /// On drop the scope deactivates the context only if it was inactive
    /// when the scope was entered, so an inner scope never closes a
    /// context that an outer caller opened.
    pub fn enter(&mut self, context: ContextId) -> Result<ContextScope<'_>, PoolError> {
        let was_active = self.is_active(context);
        self.activate(context)?;
        Ok(ContextScope {
            pool: self,
            context,
            restore: !was_active,
        })
    }

    fn gate(&self, context: ContextId) -> Result<&Repository, PoolError> {
        let repo = self.repository_of(context)?;
        if !self.active.is_active(context) {
            debug!(context = %repo.name(), "storage access outside context");
            return Err(PoolError::ContextNotActive {
                context,
                name: repo.name().to_string(),
            });
        }
        Ok(repo)
    }

    /// Storage of a parameter.
    ///
    /// Fails with [`PoolError::ContextNotActive`] if the key's context is
    /// not active. A failed call does not change any state.
    pub fn get_storage(&self, key: ParamKey) -> Result<&Storage, PoolError> {
        self.gate(key.context())?
            .get_storage(key.param())
            .ok_or(PoolError::UnknownParameter { key })
    }

    /// Mutable storage of a parameter. Same gating as
    /// [`get_storage`](Self::get_storage).
    pub fn get_storage_mut(&mut self, key: ParamKey) -> Result<&mut Storage, PoolError> {
        self.gate(key.context())?;
        self.repositories[key.context().0 as usize]
            .get_storage_mut(key.param())
            .ok_or(PoolError::UnknownParameter { key })
    }

    /// Placeholder of a pair. Never gated on activation.
    pub fn get_placeholder(&self, key: ParamKey) -> Result<Placeholder, PoolError> {
        self.placeholders
            .get(key)
            .ok_or(PoolError::UnknownParameter { key })
    }

    /// Placeholder at a global index.
    pub fn placeholder_at(&self, id: PlaceholderId) -> Option<Placeholder> {
        self.placeholders.at(id)
    }

    /// Rebind the placeholder of `key` to `storage`.
    ///
    /// Only that placeholder's binding changes. The storage must belong
    /// to this pool and have the placeholder's shape class.
    pub fn bind_placeholder(
        &mut self,
        key: ParamKey,
        storage: StorageRef,
    ) -> Result<(), PoolError> {
        let placeholder = self.get_placeholder(key)?;
        let target = self.storage_unchecked(storage.key())?;
        if target.shape_class() != placeholder.shape() {
            return Err(PoolError::ShapeMismatch {
                placeholder: placeholder.id(),
                expected: placeholder.shape(),
                found: target.shape_class(),
            });
        }
        self.bindings.bind(placeholder.id(), storage);
        trace!(placeholder = %placeholder.id(), storage = %storage.key(), "placeholder bound");
        Ok(())
    }

    /// Restore the initial binding of every placeholder of a context,
    /// i.e. each placeholder resolves to its own parameter's storage.
    pub fn reset_bindings(&mut self, context: ContextId) -> Result<(), PoolError> {
        self.repository_of(context)?;
        for p in self.placeholders.for_context(context) {
            self.bindings.reset(p.id());
        }
        trace!(context = %context, "bindings reset");
        Ok(())
    }

    /// The storage a placeholder is currently bound to. Not gated.
    pub fn bound_storage(&self, placeholder: PlaceholderId) -> Result<StorageRef, PoolError> {
        self.bindings
            .get(placeholder)
            .ok_or(PoolError::UnknownPlaceholder { placeholder })
    }

    /// Follow a placeholder's binding to its storage.
    ///
    /// Gated on the context owning the bound storage, which need not be
    /// the placeholder's own context.
    pub fn resolve(&self, placeholder: PlaceholderId) -> Result<&Storage, PoolError> {
        let bound = self.bound_storage(placeholder)?;
        trace!(placeholder = %placeholder, storage = %bound.key(), "resolve");
        self.get_storage(bound.key())
    }

    /// Mutable variant of [`resolve`](Self::resolve).
    pub fn resolve_mut(&mut self, placeholder: PlaceholderId) -> Result<&mut Storage, PoolError> {
        let bound = self.bound_storage(placeholder)?;
        trace!(placeholder = %placeholder, storage = %bound.key(), "resolve_mut");
        self.get_storage_mut(bound.key())
    }

    fn storage_unchecked(&self, key: ParamKey) -> Result<&Storage, PoolError> {
        self.repository_of(key.context())
            .ok()
            .and_then(|r| r.get_storage(key.param()))
            .ok_or(PoolError::UnknownParameter { key })
    }

    /// The validated catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The placeholder map.
    pub fn placeholders(&self) -> &PlaceholderMap {
        &self.placeholders
    }

    /// The repository of a context, for inspection.
    ///
    /// This bypasses activation gating and only exposes read access.
    pub fn repository(&self, context: ContextId) -> Option<&Repository> {
        self.repositories.get(context.0 as usize)
    }

    /// Total bytes held by all storages.
    pub fn memory_bytes(&self) -> usize {
        self.repositories.iter().map(Repository::memory_bytes).sum()
    }
}

/// A context held open for the lifetime of the scope.
///
/// Returned by [`FieldPool::enter`]; dereferences to the pool.
#[must_use = "dropping the scope immediately closes the context"]
pub struct ContextScope<'a> {
    pool: &'a mut FieldPool,
    context: ContextId,
    restore: bool,
}

impl ContextScope<'_> {
    /// The context this scope holds open.
    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl Deref for ContextScope<'_> {
    type Target = FieldPool;

    fn deref(&self) -> &FieldPool {
        self.pool
    }
}

impl DerefMut for ContextScope<'_> {
    fn deref_mut(&mut self) -> &mut FieldPool {
        self.pool
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        if self.restore && self.pool.active.deactivate(self.context) {
            debug!(context = %self.context, "context scope closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpool_arena::GridConfig;
    use fieldpool_core::{CatalogError, ParamDecl, ShapeClass};

    const DECLS: &[ContextDecl] = &[
        ContextDecl::new("dycore", &[ParamDecl::d3("u"), ParamDecl::d2("fc")]),
        ContextDecl::new("fast_waves", &[ParamDecl::d3("lgsA")]),
    ];

    const U: ParamKey = fieldpool_core::const_key(DECLS, "dycore", "u");
    const FC: ParamKey = fieldpool_core::const_key(DECLS, "dycore", "fc");
    const LGS_A: ParamKey = fieldpool_core::const_key(DECLS, "fast_waves", "lgsA");

    fn pool() -> FieldPool {
        FieldPool::from_decls(DECLS).unwrap()
    }

    #[test]
    fn storage_is_gated_by_activation() {
        let mut pool = pool();
        assert!(matches!(
            pool.get_storage(U),
            Err(PoolError::ContextNotActive { .. })
        ));
        pool.activate(U.context()).unwrap();
        assert_eq!(pool.get_storage(U).unwrap().shape_class(), ShapeClass::D3);
        pool.deactivate(U.context()).unwrap();
        assert!(pool.get_storage(U).is_err());
    }

    #[test]
    fn denied_access_leaves_state_unchanged() {
        let pool = pool();
        let _ = pool.get_storage(LGS_A);
        assert!(!pool.is_active(LGS_A.context()));
        assert!(pool.active_contexts().is_empty());
    }

    #[test]
    fn unknown_context_is_reported() {
        let mut pool = pool();
        assert_eq!(
            pool.activate(ContextId(7)),
            Err(PoolError::UnknownContext {
                context: ContextId(7)
            })
        );
    }

    #[test]
    fn foreign_key_is_unknown_parameter() {
        const WIDER: &[ContextDecl] = &[ContextDecl::new(
            "dycore",
            &[ParamDecl::d3("u"), ParamDecl::d2("fc"), ParamDecl::d3("w")],
        )];
        let mut pool = pool();
        pool.activate(ContextId(0)).unwrap();
        // Declared in another catalog, not in this pool's.
        let bogus = fieldpool_core::const_key(WIDER, "dycore", "w");
        assert_eq!(
            pool.get_storage(bogus).unwrap_err(),
            PoolError::UnknownParameter { key: bogus }
        );
        assert!(pool.get_placeholder(bogus).is_err());
    }

    #[test]
    fn placeholders_do_not_need_activation() {
        let pool = pool();
        assert_eq!(pool.get_placeholder(U).unwrap().id(), PlaceholderId(0));
        assert_eq!(pool.get_placeholder(LGS_A).unwrap().id(), PlaceholderId(2));
    }

    #[test]
    fn bind_rejects_shape_mismatch() {
        let mut pool = pool();
        pool.activate(U.context()).unwrap();
        let fc = pool.get_storage(FC).unwrap().storage_ref();
        let err = pool.bind_placeholder(U, fc).unwrap_err();
        assert_eq!(
            err,
            PoolError::ShapeMismatch {
                placeholder: PlaceholderId(0),
                expected: ShapeClass::D3,
                found: ShapeClass::D2,
            }
        );
        assert_eq!(pool.bound_storage(PlaceholderId(0)).unwrap().key(), U);
    }

    #[test]
    fn resolve_is_gated_on_bound_owner() {
        let mut pool = pool();
        pool.activate(ContextId(0)).unwrap();
        let u = pool.get_storage(U).unwrap().storage_ref();
        pool.bind_placeholder(LGS_A, u).unwrap();

        // fast_waves is inactive, but the bound storage lives in dycore.
        assert_eq!(pool.resolve(PlaceholderId(2)).unwrap().key(), U);

        pool.deactivate(ContextId(0)).unwrap();
        assert!(matches!(
            pool.resolve(PlaceholderId(2)),
            Err(PoolError::ContextNotActive { .. })
        ));
    }

    #[test]
    fn reset_bindings_restores_own_storage() {
        let mut pool = pool();
        pool.activate(ContextId(0)).unwrap();
        let u = pool.get_storage(U).unwrap().storage_ref();
        pool.bind_placeholder(LGS_A, u).unwrap();
        pool.reset_bindings(LGS_A.context()).unwrap();
        assert_eq!(pool.bound_storage(PlaceholderId(2)).unwrap().key(), LGS_A);
    }

    #[test]
    fn nested_scopes_keep_outer_context_open() {
        let mut pool = pool();
        {
            let mut outer = pool.enter(ContextId(0)).unwrap();
            {
                let inner = outer.enter(ContextId(0)).unwrap();
                assert!(inner.get_storage(U).is_ok());
            }
            assert!(outer.get_storage(U).is_ok());
        }
        assert!(!pool.is_active(ContextId(0)));
    }

    #[test]
    fn scope_leaves_explicit_activation_alone() {
        let mut pool = pool();
        pool.activate(ContextId(0)).unwrap();
        drop(pool.enter(ContextId(0)).unwrap());
        assert!(pool.is_active(ContextId(0)));
    }

    #[test]
    fn construction_rejects_bad_config() {
        let config = PoolConfig::from_decls(DECLS).with_grid(GridConfig::new(1, 1, 0));
        let err = FieldPool::new(config).unwrap_err();
        assert_eq!(err, ConfigError::ZeroExtent { axis: "nk" });

        const DUAL: &[ContextDecl] = &[ContextDecl::new(
            "fast_waves",
            &[ParamDecl::d3("rCosPhi"), ParamDecl::d2("rCosPhi")],
        )];
        assert!(matches!(
            FieldPool::from_decls(DUAL).unwrap_err(),
            ConfigError::Catalog(CatalogError::DualShapeClass { .. })
        ));
    }

    #[test]
    fn memory_bytes_counts_every_storage() {
        let config = PoolConfig::from_decls(DECLS).with_grid(GridConfig::new(2, 2, 2));
        let pool = FieldPool::new(config).unwrap();
        assert_eq!(pool.memory_bytes(), (8 + 4 + 8) * 8);
    }

    #[test]
    fn oversized_grid_is_an_error_not_a_panic() {
        let config = PoolConfig::from_decls(DECLS).with_grid(GridConfig::new(1 << 61, 1, 1));
        assert!(matches!(
            FieldPool::new(config),
            Err(ConfigError::ExtentOverflow { .. })
        ));
    }
}
