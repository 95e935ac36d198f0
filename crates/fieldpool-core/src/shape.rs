//! Shape classes and concrete extents.

use std::fmt;

/// Dimensionality class of a parameter: a horizontal slab or a full
/// three-dimensional field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeClass {
    /// Two-dimensional (`i`, `j`).
    D2,
    /// Three-dimensional (`i`, `j`, `k`).
    D3,
}

impl ShapeClass {
    /// Number of axes.
    pub const fn rank(self) -> usize {
        match self {
            Self::D2 => 2,
            Self::D3 => 3,
        }
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::D2 => write!(f, "2D"),
            Self::D3 => write!(f, "3D"),
        }
    }
}

/// Concrete extents of an allocated storage, tagged by shape class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extents {
    /// `[ni, nj]`.
    D2([usize; 2]),
    /// `[ni, nj, nk]`.
    D3([usize; 3]),
}

impl Extents {
    /// The shape class these extents belong to.
    pub fn shape_class(&self) -> ShapeClass {
        match self {
            Self::D2(_) => ShapeClass::D2,
            Self::D3(_) => ShapeClass::D3,
        }
    }

    /// Extents as a slice, one entry per axis.
    pub fn as_slice(&self) -> &[usize] {
        match self {
            Self::D2(e) => e,
            Self::D3(e) => e,
        }
    }

    /// Total number of elements, or `None` on overflow.
    pub fn checked_len(&self) -> Option<usize> {
        self.as_slice()
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    /// Total number of elements.
    ///
    /// Callers must have validated the extents (see `checked_len`);
    /// an overflowing product saturates.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Whether any axis has zero extent.
    pub fn is_empty(&self) -> bool {
        self.as_slice().contains(&0)
    }

    /// Row-major linear offset of `coord` (last axis fastest).
    ///
    /// Returns `None` if the coordinate has the wrong rank or lies
    /// outside the extents.
    pub fn offset(&self, coord: &[usize]) -> Option<usize> {
        let dims = self.as_slice();
        if coord.len() != dims.len() {
            return None;
        }
        let mut offset = 0usize;
        for (&c, &n) in coord.iter().zip(dims) {
            if c >= n {
                return None;
            }
            offset = offset * n + c;
        }
        Some(offset)
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::D2([i, j]) => write!(f, "{i}x{j}"),
            Self::D3([i, j, k]) => write!(f, "{i}x{j}x{k}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shape_class_matches_variant() {
        assert_eq!(Extents::D2([4, 5]).shape_class(), ShapeClass::D2);
        assert_eq!(Extents::D3([4, 5, 6]).shape_class(), ShapeClass::D3);
        assert_eq!(ShapeClass::D3.rank(), 3);
    }

    #[test]
    fn len_is_product_of_axes() {
        assert_eq!(Extents::D2([10, 10]).len(), 100);
        assert_eq!(Extents::D3([10, 10, 10]).len(), 1000);
    }

    #[test]
    fn checked_len_detects_overflow() {
        assert_eq!(Extents::D3([usize::MAX, 2, 1]).checked_len(), None);
    }

    #[test]
    fn offset_is_row_major() {
        let e = Extents::D3([2, 3, 4]);
        assert_eq!(e.offset(&[0, 0, 1]), Some(1));
        assert_eq!(e.offset(&[0, 1, 0]), Some(4));
        assert_eq!(e.offset(&[1, 0, 0]), Some(12));
        assert_eq!(e.offset(&[1, 2, 3]), Some(23));
    }

    #[test]
    fn offset_rejects_out_of_bounds_and_wrong_rank() {
        let e = Extents::D2([3, 3]);
        assert_eq!(e.offset(&[3, 0]), None);
        assert_eq!(e.offset(&[0, 0, 0]), None);
    }

    #[test]
    fn display_formats_axes() {
        assert_eq!(Extents::D3([10, 10, 10]).to_string(), "10x10x10");
        assert_eq!(ShapeClass::D2.to_string(), "2D");
    }

    proptest! {
        #[test]
        fn offsets_cover_storage_exactly(ni in 1usize..6, nj in 1usize..6, nk in 1usize..6) {
            let e = Extents::D3([ni, nj, nk]);
            let mut seen = vec![false; e.len()];
            for i in 0..ni {
                for j in 0..nj {
                    for k in 0..nk {
                        let off = e.offset(&[i, j, k]).unwrap();
                        prop_assert!(!seen[off]);
                        seen[off] = true;
                    }
                }
            }
            prop_assert!(seen.iter().all(|&s| s));
        }
    }
}
