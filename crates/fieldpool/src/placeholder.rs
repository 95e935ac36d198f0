//! Global placeholder map and the placeholder → storage binding table.
//!
//! The [`PlaceholderMap`] gives every `(context, parameter)` pair of the
//! catalog a dense, zero-based [`PlaceholderId`]. Ids are assigned by
//! walking contexts in declaration order and, within each context, its
//! parameters in declaration order, so they are stable for the lifetime
//! of the catalog and never collide.
//!
//! The [`BindingTable`] records which storage each placeholder currently
//! resolves to. Rebinding is a table update; the placeholder itself never
//! changes, which is what lets one kernel description run against many
//! storages.

use indexmap::IndexMap;

use fieldpool_arena::StorageRef;
use fieldpool_core::{Catalog, ContextId, ParamKey, PlaceholderId, ShapeClass};

/// Symbolic handle for one `(context, parameter)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placeholder {
    id: PlaceholderId,
    key: ParamKey,
    shape: ShapeClass,
}

impl Placeholder {
    /// Dense global index.
    pub fn id(&self) -> PlaceholderId {
        self.id
    }

    /// The pair this placeholder stands for.
    pub fn key(&self) -> ParamKey {
        self.key
    }

    /// Owning context.
    pub fn context(&self) -> ContextId {
        self.key.context()
    }

    /// Declared shape class; only storages of this class can be bound.
    pub fn shape(&self) -> ShapeClass {
        self.shape
    }
}

/// Dense enumeration of every declared `(context, parameter)` pair.
#[derive(Clone, Debug)]
pub struct PlaceholderMap {
    /// `PlaceholderId(n)` is `entries[n]`.
    entries: Vec<Placeholder>,
    index: IndexMap<ParamKey, PlaceholderId>,
}

impl PlaceholderMap {
    /// Enumerate every parameter of `catalog`.
    pub fn build(catalog: &Catalog) -> Self {
        let total = catalog.total_params();
        let mut entries = Vec::with_capacity(total);
        let mut index = IndexMap::with_capacity(total);
        for (context, _) in catalog.contexts() {
            for (key, spec) in catalog.params(context) {
                // Catalog validation bounds the total by u32::MAX.
                let id = PlaceholderId(entries.len() as u32);
                entries.push(Placeholder {
                    id,
                    key,
                    shape: spec.shape,
                });
                index.insert(key, id);
            }
        }
        Self { entries, index }
    }

    /// Placeholder of a pair, in O(1).
    pub fn get(&self, key: ParamKey) -> Option<Placeholder> {
        let id = self.index.get(&key)?;
        self.at(*id)
    }

    /// Placeholder at a global index, in O(1).
    pub fn at(&self, id: PlaceholderId) -> Option<Placeholder> {
        self.entries.get(id.0 as usize).copied()
    }

    /// All placeholders in index order.
    pub fn iter(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.entries.iter().copied()
    }

    /// Placeholders of one context in index order.
    pub fn for_context(&self, context: ContextId) -> impl Iterator<Item = Placeholder> + '_ {
        self.iter().filter(move |p| p.context() == context)
    }

    /// Number of placeholders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Current storage of every placeholder.
#[derive(Clone, Debug)]
pub struct BindingTable {
    /// `PlaceholderId(n)` is bound to `bound[n]`.
    bound: Vec<StorageRef>,
    initial: Vec<StorageRef>,
}

impl BindingTable {
    /// A table whose bindings start at `initial`, indexed by placeholder id.
    pub fn new(initial: Vec<StorageRef>) -> Self {
        Self {
            bound: initial.clone(),
            initial,
        }
    }

    /// Current binding of a placeholder.
    pub fn get(&self, id: PlaceholderId) -> Option<StorageRef> {
        self.bound.get(id.0 as usize).copied()
    }

    /// Rebind a placeholder, returning the previous binding.
    ///
    /// Returns `None`, and changes nothing, if `id` is out of range.
    pub fn bind(&mut self, id: PlaceholderId, storage: StorageRef) -> Option<StorageRef> {
        let slot = self.bound.get_mut(id.0 as usize)?;
        Some(std::mem::replace(slot, storage))
    }

    /// Restore a placeholder's initial binding.
    pub fn reset(&mut self, id: PlaceholderId) -> Option<StorageRef> {
        let initial = *self.initial.get(id.0 as usize)?;
        self.bind(id, initial)
    }

    /// Whether a placeholder is still bound to its initial storage.
    pub fn is_initial(&self, id: PlaceholderId) -> bool {
        let i = id.0 as usize;
        matches!((self.bound.get(i), self.initial.get(i)), (Some(b), Some(init)) if b == init)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
