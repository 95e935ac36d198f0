//! Owned field storage and the [`StorageRef`] that names it.

use std::fmt;

use fieldpool_core::{Extents, ParamKey, ShapeClass};

use crate::error::ConfigError;

/// A lightweight reference to a storage owned by some repository.
///
/// Only obtainable from a live [`Storage`], so it always names a real
/// allocation. It carries the shape class so a binding can be checked
/// without a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct StorageRef {
    key: ParamKey,
    shape: ShapeClass,
}

impl StorageRef {
    /// The parameter whose storage this is.
    pub fn key(&self) -> ParamKey {
        self.key
    }

    /// Shape class of the referenced storage.
    pub fn shape(&self) -> ShapeClass {
        self.shape
    }
}

impl fmt::Display for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageRef({}, {})", self.key, self.shape)
    }
}

/// A contiguous multi-dimensional array of `f64` plus its extents.
///
/// Layout is row-major with the last axis fastest, i.e. element
/// `(i, j, k)` of a 3D storage lives at `(i * nj + j) * nk + k`.
///
/// A storage is owned by its [`Repository`](crate::Repository) and is
/// never duplicated; callers borrow it or hold a [`StorageRef`].
///
/// ```compile_fail
/// fn duplicate(s: &fieldpool_arena::Storage) -> fieldpool_arena::Storage {
///     s.clone()
/// }
/// ```
#[derive(Debug, PartialEq)]
pub struct Storage {
    key: ParamKey,
    extents: Extents,
    data: Vec<f64>,
}

impl Storage {
    /// Allocate a zero-initialised storage for `key`.
    ///
    /// Reports allocator failure instead of aborting.
    pub(crate) fn zeroed(key: ParamKey, extents: Extents) -> Result<Self, ConfigError> {
        let len = extents.checked_len().ok_or_else(|| ConfigError::ExtentOverflow {
            grid: extents.to_string(),
        })?;
        let bytes = len.saturating_mul(std::mem::size_of::<f64>());
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| ConfigError::AllocationFailed { key, bytes })?;
        data.resize(len, 0.0);
        Ok(Self { key, extents, data })
    }

    /// The owning parameter.
    pub fn key(&self) -> ParamKey {
        self.key
    }

    /// A copyable reference to this storage.
    pub fn storage_ref(&self) -> StorageRef {
        StorageRef {
            key: self.key,
            shape: self.shape_class(),
        }
    }

    /// Extents of the array.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Shape class of the array.
    pub fn shape_class(&self) -> ShapeClass {
        self.extents.shape_class()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the storage holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read-only view of the raw data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable view of the raw data.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at `coord`, or `None` if out of bounds or of the wrong rank.
    pub fn get(&self, coord: &[usize]) -> Option<f64> {
        self.extents.offset(coord).map(|off| self.data[off])
    }

    /// Mutable reference to the value at `coord`.
    pub fn get_mut(&mut self, coord: &[usize]) -> Option<&mut f64> {
        let off = self.extents.offset(coord)?;
        self.data.get_mut(off)
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Memory held by the data buffer, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f64>()
    }
}
