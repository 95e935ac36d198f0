//! Test utilities for field pool development.
//!
//! Provides pool constructors on small grids and a reference
//! vertical-advection kernel that exercises placeholder rebinding.

pub mod fixtures;

pub use fixtures::{atmosphere_pool, fill, VerticalAdvection, SMALL_GRID};
