//! Eagerly allocated field storage for the field pool.
//!
//! Every context owns one [`Repository`], and every repository owns one
//! [`Storage`] per parameter its context declares:
//!
//! ```text
//! Repository (one per ContextId)
//! └── Storage × n (indexed by ParamId)
//!     ├── Extents (D2 [ni, nj] | D3 [ni, nj, nk])
//!     └── Vec<f64> (row-major, k fastest, zero-initialised)
//! ```
//!
//! Storage is allocated once at construction and never freed while the
//! repository lives. Nothing outside the repository owns field data;
//! callers borrow it or hold a [`StorageRef`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod repository;
pub mod storage;

pub use config::GridConfig;
pub use error::ConfigError;
pub use repository::Repository;
pub use storage::{Storage, StorageRef};
