//! Benchmark profiles for the field pool.
//!
//! - [`reference_pool`]: the atmospheric catalog on a 64x64x60 grid
//! - [`stress_catalog_pool`]: a synthetic catalog with many contexts, for
//!   placeholder-map sizing

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fieldpool::atmosphere;
use fieldpool::{FieldPool, GridConfig, PoolConfig};
use fieldpool_core::{CatalogBuilder, ShapeClass};

/// The atmospheric catalog on a 64x64x60 grid with every context active.
pub fn reference_pool() -> FieldPool {
    let config = PoolConfig::from_decls(atmosphere::CATALOG).with_grid(GridConfig::new(64, 64, 60));
    let mut pool = FieldPool::new(config).unwrap();
    activate_all(&mut pool);
    pool
}

/// `contexts` contexts of `params` parameters each (alternating 3D/2D) on
/// a 4x4x4 grid, every context active.
pub fn stress_catalog_pool(contexts: usize, params: usize) -> FieldPool {
    let mut builder = CatalogBuilder::new();
    for c in 0..contexts {
        builder = builder.context(format!("ctx{c}"));
        for p in 0..params {
            let shape = if p % 2 == 0 { ShapeClass::D3 } else { ShapeClass::D2 };
            builder = builder.param(format!("p{p}"), shape);
        }
    }
    let catalog = builder.build().unwrap();
    let config = PoolConfig {
        contexts: catalog.contexts().map(|(_, spec)| spec.clone()).collect(),
        grid: GridConfig::new(4, 4, 4),
    };
    let mut pool = FieldPool::new(config).unwrap();
    activate_all(&mut pool);
    pool
}

fn activate_all(pool: &mut FieldPool) {
    let ids: Vec<_> = pool.catalog().contexts().map(|(id, _)| id).collect();
    for id in ids {
        pool.activate(id).unwrap();
    }
}
