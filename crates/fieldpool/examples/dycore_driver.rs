//! Dycore driver — one time step's worth of field-pool traffic.
//!
//! Demonstrates:
//!   1. Building the pool once at start-up
//!   2. Building a kernel description from placeholders before any
//!      context is entered
//!   3. Bracketing dycore field access with activate/deactivate
//!   4. Rebinding one vertical-advection description to u, v and w
//!   5. Entering the fast-waves context from inside the dycore
//!
//! Run with:
//!   RUST_LOG=fieldpool=trace cargo run --example dycore_driver

use std::error::Error;

use fieldpool::atmosphere::{self, dycore, fast_waves, vadvect};
use fieldpool::{FieldPool, Placeholder, PoolError, StorageRef};
use tracing_subscriber::EnvFilter;

// ─── Vertical advection ─────────────────────────────────────────
//
// Stand-in numerics: each level is advected by the Coriolis factor of
// its column. What matters is the binding pattern, not the physics.

struct VerticalAdvection {
    data: Placeholder,
    fc: Placeholder,
    datatens: Placeholder,
}

impl VerticalAdvection {
    fn new(pool: &FieldPool) -> Result<Self, PoolError> {
        Ok(Self {
            data: pool.get_placeholder(vadvect::DATA)?,
            fc: pool.get_placeholder(vadvect::FC)?,
            datatens: pool.get_placeholder(vadvect::DATATENS)?,
        })
    }

    fn single(
        &self,
        pool: &mut FieldPool,
        input: StorageRef,
        fc: StorageRef,
        output: StorageRef,
    ) -> Result<(), PoolError> {
        pool.bind_placeholder(self.data.key(), input)?;
        pool.bind_placeholder(self.fc.key(), fc)?;
        pool.bind_placeholder(self.datatens.key(), output)?;

        let data = pool.resolve(self.data.id())?.as_slice().to_vec();
        let fc = pool.resolve(self.fc.id())?.as_slice().to_vec();
        let out = pool.resolve_mut(self.datatens.id())?;
        let nk = out.len() / fc.len();
        for (n, v) in out.as_mut_slice().iter_mut().enumerate() {
            *v = data[n] * fc[n / nk];
        }
        Ok(())
    }
}

fn fast_waves_step(pool: &mut FieldPool) -> Result<(), PoolError> {
    let mut scope = pool.enter(fast_waves::CONTEXT)?;
    scope.get_storage_mut(fast_waves::LGS_B)?.fill(1.0);
    let rhs = scope.get_storage(fast_waves::LGS_RHS)?;
    println!("fast waves: lgsRHS is {}", rhs.extents());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut pool = atmosphere::pool()?;
    let va = VerticalAdvection::new(&pool)?;

    pool.activate(dycore::CONTEXT)?;
    pool.get_storage_mut(dycore::U)?.fill(1.0);
    pool.get_storage_mut(dycore::V)?.fill(2.0);
    pool.get_storage_mut(dycore::W)?.fill(3.0);
    pool.get_storage_mut(dycore::FC)?.fill(1e-4);

    let r = |pool: &FieldPool, key| pool.get_storage(key).map(|s| s.storage_ref());
    let fc = r(&pool, dycore::FC)?;
    for (input, output) in [
        (dycore::U, dycore::UTENS),
        (dycore::V, dycore::VTENS),
        (dycore::W, dycore::WTENS),
    ] {
        let (input, output) = (r(&pool, input)?, r(&pool, output)?);
        va.single(&mut pool, input, fc, output)?;
    }
    println!(
        "wtens[0,0,0] = {:?}",
        pool.get_storage(dycore::WTENS)?.get(&[0, 0, 0])
    );

    // Out of context: the fast-waves solver has not been entered yet.
    if let Err(e) = pool.get_storage(fast_waves::LGS_A) {
        println!("expected: {e}");
    }

    fast_waves_step(&mut pool)?;

    pool.deactivate(dycore::CONTEXT)?;
    println!("active after step: {:?}", pool.active_contexts());
    Ok(())
}
