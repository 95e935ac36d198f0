//! Construction-time configuration errors.

use std::error::Error;
use std::fmt;

use fieldpool_core::{CatalogError, ContextId, ParamKey};

/// Errors detected while validating pool or grid configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The parameter catalog is malformed.
    Catalog(CatalogError),
    /// A grid axis has zero extent.
    ZeroExtent {
        /// Axis name (`"ni"`, `"nj"` or `"nk"`).
        axis: &'static str,
    },
    /// The byte size of a storage exceeds `isize::MAX`.
    ExtentOverflow {
        /// The grid that overflowed, formatted as `ni x nj x nk`.
        grid: String,
    },
    /// A repository was requested for a context the catalog does not declare.
    UnknownContext {
        /// The offending id.
        context: ContextId,
    },
    /// The allocator could not provide a storage's buffer.
    AllocationFailed {
        /// The parameter being allocated.
        key: ParamKey,
        /// Requested size in bytes.
        bytes: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "catalog: {e}"),
            Self::ZeroExtent { axis } => write!(f, "grid axis {axis} must be at least 1"),
            Self::ExtentOverflow { grid } => {
                write!(f, "grid {grid} has more elements than fit in memory")
            }
            Self::UnknownContext { context } => write!(f, "unknown context: {context}"),
            Self::AllocationFailed { key, bytes } => {
                write!(f, "failed to allocate {bytes} bytes for parameter {key}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for ConfigError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}
