//! Core types for the field pool.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, shape classes, and the declarative parameter catalog
//! that every other crate in the workspace builds on, plus the error
//! types shared across them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod id;
pub mod shape;

pub use catalog::{
    const_key, is_well_formed, Catalog, CatalogBuilder, ContextDecl, ContextSpec, ParamDecl,
    ParamSpec,
};
pub use error::{CatalogError, PoolError};
pub use id::{ContextId, ParamId, ParamKey, PlaceholderId};
pub use shape::{Extents, ShapeClass};
