//! Error types for the field pool.
//!
//! Two families: [`CatalogError`] is raised while a declaration table is
//! turned into a [`Catalog`](crate::Catalog) and is always fatal to
//! construction; [`PoolError`] is raised by runtime calls on the pool.

use std::error::Error;
use std::fmt;

use crate::id::{ContextId, ParamKey, PlaceholderId};
use crate::shape::ShapeClass;

/// Malformed parameter catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// A context was declared with an empty name.
    EmptyContextName {
        /// Position of the context in declaration order.
        index: usize,
    },
    /// A parameter was declared with an empty name.
    EmptyParamName {
        /// Name of the owning context.
        context: String,
    },
    /// Two contexts share a name.
    DuplicateContext {
        /// The repeated name.
        name: String,
    },
    /// A parameter is declared twice in the same context with the same
    /// shape class.
    DuplicateParameter {
        /// Name of the owning context.
        context: String,
        /// The repeated parameter name.
        param: String,
    },
    /// A parameter is declared under both the 2D and the 3D shape class.
    DualShapeClass {
        /// Name of the owning context.
        context: String,
        /// The ambiguous parameter name.
        param: String,
    },
    /// A parameter was added to a builder before any context was opened.
    ParameterOutsideContext {
        /// The orphaned parameter name.
        param: String,
    },
    /// More contexts or parameters than fit the `u32` id space.
    TooManyEntries {
        /// Number of entries requested.
        count: usize,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContextName { index } => {
                write!(f, "context #{index} has an empty name")
            }
            Self::EmptyParamName { context } => {
                write!(f, "context '{context}' declares a parameter with an empty name")
            }
            Self::DuplicateContext { name } => write!(f, "context '{name}' declared twice"),
            Self::DuplicateParameter { context, param } => {
                write!(f, "parameter '{param}' declared twice in context '{context}'")
            }
            Self::DualShapeClass { context, param } => {
                write!(
                    f,
                    "parameter '{param}' in context '{context}' declared as both 2D and 3D"
                )
            }
            Self::ParameterOutsideContext { param } => {
                write!(f, "parameter '{param}' declared before any context")
            }
            Self::TooManyEntries { count } => {
                write!(f, "{count} catalog entries exceed the u32 id space")
            }
        }
    }
}

impl Error for CatalogError {}

/// Errors from runtime calls on the field pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A storage of a context was requested while that context is not
    /// active.
    ContextNotActive {
        /// The inactive context.
        context: ContextId,
        /// Its catalog name.
        name: String,
    },
    /// The context id is not part of this pool's catalog.
    UnknownContext {
        /// The unrecognised context.
        context: ContextId,
    },
    /// The key does not name a declared parameter of this pool's catalog.
    UnknownParameter {
        /// The unrecognised key.
        key: ParamKey,
    },
    /// The placeholder id is outside this pool's placeholder map.
    UnknownPlaceholder {
        /// The unrecognised placeholder.
        placeholder: PlaceholderId,
    },
    /// A storage of one shape class was bound to a placeholder of another.
    ShapeMismatch {
        /// The placeholder being bound.
        placeholder: PlaceholderId,
        /// Shape class declared for the placeholder.
        expected: ShapeClass,
        /// Shape class of the offered storage.
        found: ShapeClass,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextNotActive { context, name } => {
                write!(
                    f,
                    "cannot access storage of context '{name}' ({context}): context not active"
                )
            }
            Self::UnknownContext { context } => write!(f, "unknown context: {context}"),
            Self::UnknownParameter { key } => write!(f, "unknown parameter: {key}"),
            Self::UnknownPlaceholder { placeholder } => {
                write!(f, "unknown placeholder: {placeholder}")
            }
            Self::ShapeMismatch {
                placeholder,
                expected,
                found,
            } => {
                write!(
                    f,
                    "placeholder {placeholder} expects a {expected} storage, got {found}"
                )
            }
        }
    }
}

impl Error for PoolError {}
