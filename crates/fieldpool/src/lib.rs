//! Context-gated field registry for stencil kernels.
//!
//! A [`FieldPool`] owns one repository of storages per context of a
//! parameter catalog, a table of which contexts are currently active,
//! and a global placeholder map:
//!
//! ```text
//! FieldPool
//! ├── Catalog            (contexts → parameters → shape class)
//! ├── Repository × n     (one per context, storages allocated eagerly)
//! ├── ActiveContextSet   (one flag per context; gates get_storage)
//! ├── PlaceholderMap     (dense global index over every (context, param))
//! └── BindingTable       (placeholder → currently bound storage)
//! ```
//!
//! Storage access is only allowed inside a context's activation window.
//! Placeholders are available at any time, so a kernel description can
//! be built before any context is entered and then rebound to different
//! storages before each run.
//!
//! # Example
//!
//! ```
//! use fieldpool::atmosphere::{self, dycore};
//! use fieldpool::{PoolError, ShapeClass};
//!
//! let mut pool = atmosphere::pool().unwrap();
//! assert!(matches!(
//!     pool.get_storage(dycore::U),
//!     Err(PoolError::ContextNotActive { .. })
//! ));
//!
//! pool.activate(dycore::CONTEXT).unwrap();
//! assert_eq!(pool.get_storage(dycore::U).unwrap().shape_class(), ShapeClass::D3);
//! pool.deactivate(dycore::CONTEXT).unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod active;
pub mod atmosphere;
pub mod config;
pub mod placeholder;
pub mod pool;

pub use active::ActiveContextSet;
pub use config::PoolConfig;
pub use placeholder::{BindingTable, Placeholder, PlaceholderMap};
pub use pool::{ContextScope, FieldPool};

pub use fieldpool_arena::{ConfigError, GridConfig, Repository, Storage, StorageRef};
pub use fieldpool_core::{
    Catalog, ContextDecl, ContextId, Extents, ParamDecl, ParamId, ParamKey, PlaceholderId,
    PoolError, ShapeClass,
};
