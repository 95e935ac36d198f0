//! Grid configuration.

use fieldpool_core::{Extents, ShapeClass};

use crate::error::ConfigError;

/// Extents used when allocating storages.
///
/// 2D parameters are allocated `ni × nj`, 3D parameters `ni × nj × nk`.
/// The defaults stand in for a grid size that a real model reads from
/// its namelist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Points along the first horizontal axis. Default: 10.
    pub ni: usize,
    /// Points along the second horizontal axis. Default: 10.
    pub nj: usize,
    /// Vertical levels. Default: 10.
    pub nk: usize,
}

impl GridConfig {
    /// Default first-axis extent.
    pub const DEFAULT_NI: usize = 10;

    /// Default second-axis extent.
    pub const DEFAULT_NJ: usize = 10;

    /// Default vertical extent.
    pub const DEFAULT_NK: usize = 10;

    /// Create a grid config with explicit extents.
    pub fn new(ni: usize, nj: usize, nk: usize) -> Self {
        Self { ni, nj, nk }
    }

    /// Check that every axis is non-empty and that a 3D storage's byte
    /// size fits in `isize`, the limit on any single allocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, n) in [("ni", self.ni), ("nj", self.nj), ("nk", self.nk)] {
            if n == 0 {
                return Err(ConfigError::ZeroExtent { axis });
            }
        }
        let bytes = self
            .extents_3d()
            .checked_len()
            .and_then(|n| n.checked_mul(std::mem::size_of::<f64>()));
        if !bytes.is_some_and(|b| b <= isize::MAX as usize) {
            return Err(ConfigError::ExtentOverflow {
                grid: format!("{} x {} x {}", self.ni, self.nj, self.nk),
            });
        }
        Ok(())
    }

    /// Extents of a 2D storage.
    pub fn extents_2d(&self) -> Extents {
        Extents::D2([self.ni, self.nj])
    }

    /// Extents of a 3D storage.
    pub fn extents_3d(&self) -> Extents {
        Extents::D3([self.ni, self.nj, self.nk])
    }

    /// Extents for a parameter of the given shape class.
    pub fn extents_for(&self, shape: ShapeClass) -> Extents {
        match shape {
            ShapeClass::D2 => self.extents_2d(),
            ShapeClass::D3 => self.extents_3d(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NI, Self::DEFAULT_NJ, Self::DEFAULT_NK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_ten_cubed() {
        let grid = GridConfig::default();
        assert_eq!(grid.extents_2d(), Extents::D2([10, 10]));
        assert_eq!(grid.extents_3d(), Extents::D3([10, 10, 10]));
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn extents_for_follows_shape_class() {
        let grid = GridConfig::new(4, 5, 6);
        assert_eq!(grid.extents_for(ShapeClass::D2), Extents::D2([4, 5]));
        assert_eq!(grid.extents_for(ShapeClass::D3), Extents::D3([4, 5, 6]));
    }

    #[test]
    fn zero_axis_is_rejected() {
        let err = GridConfig::new(10, 0, 10).validate().unwrap_err();
        assert_eq!(err, ConfigError::ZeroExtent { axis: "nj" });
    }

    #[test]
    fn overflowing_grid_is_rejected() {
        let err = GridConfig::new(usize::MAX, 2, 2).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ExtentOverflow { .. }));
    }

    #[test]
    fn grid_whose_bytes_overflow_isize_is_rejected() {
        // 2^61 elements fit in usize, 2^64 bytes do not fit in isize.
        let err = GridConfig::new(1 << 61, 1, 1).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ExtentOverflow { .. }));
        let err = GridConfig::new(1 << 20, 1 << 20, 1 << 20).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ExtentOverflow { .. }));
    }

    #[test]
    fn largest_addressable_grid_passes() {
        let max = isize::MAX as usize / std::mem::size_of::<f64>();
        assert!(GridConfig::new(max, 1, 1).validate().is_ok());
        assert!(GridConfig::new(max + 1, 1, 1).validate().is_err());
    }
}
