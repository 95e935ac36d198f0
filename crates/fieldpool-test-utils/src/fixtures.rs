//! Reusable fixtures.
//!
//! - [`atmosphere_pool`]: the atmospheric catalog on [`SMALL_GRID`].
//! - [`VerticalAdvection`]: one kernel description built from `vadvect`
//!   placeholders, applied to several prognostic fields by rebinding.

use fieldpool::atmosphere::{self, dycore, vadvect};
use fieldpool::{FieldPool, GridConfig, ParamKey, Placeholder, PoolConfig, PoolError, StorageRef};

/// A grid small enough to keep tests fast but with distinct axis lengths,
/// so transposed indexing shows up as a failure.
pub const SMALL_GRID: (usize, usize, usize) = (4, 3, 5);

/// The atmospheric catalog allocated on [`SMALL_GRID`].
pub fn atmosphere_pool() -> FieldPool {
    let (ni, nj, nk) = SMALL_GRID;
    let config =
        PoolConfig::from_decls(atmosphere::CATALOG).with_grid(GridConfig::new(ni, nj, nk));
    FieldPool::new(config).expect("atmosphere catalog is valid")
}

/// Fill a storage with a constant. The key's context must be active.
pub fn fill(pool: &mut FieldPool, key: ParamKey, value: f64) -> Result<(), PoolError> {
    pool.get_storage_mut(key)?.fill(value);
    Ok(())
}

/// Vertical advection as a reusable kernel description.
///
/// The description holds placeholders only, so it can be built before
/// any context is entered. Each [`apply`](Self::apply) rebinds the
/// generic `vadvect` placeholders to concrete storages and then executes.
///
/// The numerics are a stand-in: `datatens = data * fc * hdmask`, where
/// `hdmask` is the dycore's constant mask field, bound once.
pub struct VerticalAdvection {
    data: Placeholder,
    fc: Placeholder,
    datatens: Placeholder,
    hdmask: Placeholder,
    runs: usize,
}

impl VerticalAdvection {
    /// Build the kernel description from placeholders.
    pub fn new(pool: &FieldPool) -> Result<Self, PoolError> {
        Ok(Self {
            data: pool.get_placeholder(vadvect::DATA)?,
            fc: pool.get_placeholder(vadvect::FC)?,
            datatens: pool.get_placeholder(vadvect::DATATENS)?,
            // Not a vadvect placeholder: constant fields stay bound to the
            // dycore storage for the whole run.
            hdmask: pool.get_placeholder(dycore::HDMASK)?,
            runs: 0,
        })
    }

    /// Number of completed executions.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Bind `input`/`fc`/`output` and execute once.
    pub fn apply(
        &mut self,
        pool: &mut FieldPool,
        input: StorageRef,
        fc: StorageRef,
        output: StorageRef,
    ) -> Result<(), PoolError> {
        pool.bind_placeholder(self.data.key(), input)?;
        pool.bind_placeholder(self.fc.key(), fc)?;
        pool.bind_placeholder(self.datatens.key(), output)?;
        self.execute(pool)
    }

    /// Apply to each `(input, output)` pair in turn, sharing `fc`.
    pub fn run(
        &mut self,
        pool: &mut FieldPool,
        fields: &[(StorageRef, StorageRef)],
        fc: StorageRef,
    ) -> Result<(), PoolError> {
        for &(input, output) in fields {
            self.apply(pool, input, fc, output)?;
        }
        Ok(())
    }

    /// Execute against whatever the placeholders are bound to right now.
    pub fn execute(&mut self, pool: &mut FieldPool) -> Result<(), PoolError> {
        // Copy inputs out: the output borrow is exclusive.
        let data = pool.resolve(self.data.id())?.as_slice().to_vec();
        let hdmask = pool.resolve(self.hdmask.id())?.as_slice().to_vec();
        let fc_storage = pool.resolve(self.fc.id())?;
        let fc = fc_storage.as_slice().to_vec();
        let columns = fc_storage.len();

        let out = pool.resolve_mut(self.datatens.id())?;
        let nk = out.len() / columns.max(1);
        for (n, value) in out.as_mut_slice().iter_mut().enumerate() {
            *value = data[n] * fc[n / nk] * hdmask[n];
        }
        self.runs += 1;
        Ok(())
    }
}
