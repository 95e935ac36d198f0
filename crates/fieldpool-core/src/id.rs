//! Strongly-typed identifiers for contexts, parameters and placeholders.

use std::fmt;

/// Identifies a context within a catalog.
///
/// Contexts are declared statically and assigned sequential IDs.
/// `ContextId(n)` corresponds to the n-th context in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ContextId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a parameter within its context.
///
/// `ParamId(n)` is the n-th parameter declared for the context; it carries
/// no meaning without the owning [`ContextId`]. See [`ParamKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParamId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A `(context, parameter)` pair naming exactly one field.
///
/// Keys are only minted by the catalog: at compile time with
/// [`const_key`](crate::catalog::const_key), or at runtime through
/// [`Catalog::key`](crate::Catalog::key) and
/// [`Catalog::params`](crate::Catalog::params). A key naming an
/// undeclared pair cannot be written by hand:
///
/// ```compile_fail
/// use fieldpool_core::{ContextId, ParamId, ParamKey};
///
/// let key = ParamKey::new(ContextId(0), ParamId(99));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamKey {
    context: ContextId,
    param: ParamId,
}

impl ParamKey {
    pub(crate) const fn new(context: ContextId, param: ParamId) -> Self {
        Self { context, param }
    }

    /// Owning context.
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// Parameter within the context.
    pub const fn param(&self) -> ParamId {
        self.param
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.context, self.param)
    }
}

/// Dense global index of a placeholder.
///
/// Every declared `(context, parameter)` pair across the whole catalog
/// gets one, numbered from zero in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderId(pub u32);

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlaceholderId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
