//! Affine index-to-offset maps.

use crate::extent::Extent;
use crate::index::Index;
use crate::range::Range;
use crate::stride::Stride;
use crate::{Result, StructureError};

/// Maps a logical index to a flat storage offset:
/// `offset(index) = base + Σ index[d] * strides[d]`.
///
/// Every derivation (`with_range`, `with_stride`, `permute`, `transpose`)
/// folds into a new `(base, strides)` pair, so a chain of views costs the same
/// to resolve as the structure it started from.
///
/// A zero stride is allowed and broadcasts the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order<const N: usize> {
    base: usize,
    strides: [usize; N],
}

pub type Order1d = Order<1>;
pub type Order2d = Order<2>;
pub type Order3d = Order<3>;

impl<const N: usize> Order<N> {
    #[inline]
    pub const fn new(base: usize, strides: [usize; N]) -> Self {
        Self { base, strides }
    }

    /// Row-major order for `extent`: the last dimension is contiguous.
    pub fn row_major(extent: &Extent<N>) -> Self {
        let mut strides = [1usize; N];
        for d in (0..N.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1].saturating_mul(extent.at(d + 1));
        }
        Self { base: 0, strides }
    }

    #[inline]
    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline]
    pub const fn strides(&self) -> [usize; N] {
        self.strides
    }

    #[inline]
    pub fn stride(&self, dim: usize) -> usize {
        self.strides[dim]
    }

    /// Storage offset of `index`. The index is not range checked.
    #[inline]
    pub fn offset(&self, index: &Index<N>) -> usize {
        self.offset_of(&index.to_array())
    }

    /// Storage offset of a raw coordinate buffer, as filled by a cursor.
    #[inline]
    pub fn offset_of(&self, coords: &[usize; N]) -> usize {
        let mut offset = self.base;
        for d in 0..N {
            offset += coords[d] * self.strides[d];
        }
        offset
    }

    /// Logical index stored at `offset`, the inverse of [`offset`](Self::offset).
    ///
    /// Coordinates are peeled off from the largest stride down, which is exact
    /// for row-major orders and every view derived from them. Broadcast
    /// dimensions resolve to coordinate 0. Returns `None` if `offset` lies
    /// before the base or is not reachable by any index.
    pub fn index(&self, offset: usize) -> Option<Index<N>> {
        let mut rest = offset.checked_sub(self.base)?;
        let mut dims: [usize; N] = std::array::from_fn(|d| d);
        dims.sort_unstable_by(|&a, &b| self.strides[b].cmp(&self.strides[a]));
        let mut coords = [0usize; N];
        for d in dims {
            let stride = self.strides[d];
            if stride > 0 {
                coords[d] = rest / stride;
                rest %= stride;
            }
        }
        (rest == 0).then(|| Index::from_array(coords))
    }

    /// Order of the sub-region starting at `range.start()`.
    #[inline]
    pub fn with_range(&self, range: &Range<N>) -> Self {
        Self {
            base: self.offset(&range.start()),
            strides: self.strides,
        }
    }

    /// Order visiting every `stride[d]`-th element of each dimension.
    ///
    /// The product saturates. A step that large leaves at most one element in
    /// that dimension, so the saturated stride is never multiplied by a
    /// non-zero coordinate.
    pub fn with_stride(&self, stride: &Stride<N>) -> Self {
        let mut strides = self.strides;
        for (s, &step) in strides.iter_mut().zip(stride.as_slice()) {
            *s = s.saturating_mul(step);
        }
        Self {
            base: self.base,
            strides,
        }
    }

    /// Reorder dimensions: new dimension `i` is old dimension `perm[i]`.
    ///
    /// # Errors
    /// Returns [`StructureError::InvalidAxis`] if `perm` is not a permutation of `0..N`.
    pub fn permute(&self, perm: &[usize; N]) -> Result<Self> {
        check_permutation(perm)?;
        Ok(self.permuted(perm))
    }

    pub(crate) fn permuted(&self, perm: &[usize; N]) -> Self {
        let mut strides = [0usize; N];
        for (s, &p) in strides.iter_mut().zip(perm.iter()) {
            *s = self.strides[p];
        }
        Self {
            base: self.base,
            strides,
        }
    }
}

impl Order<2> {
    /// Swap the row and column strides.
    #[inline]
    pub const fn transpose(&self) -> Self {
        Self {
            base: self.base,
            strides: [self.strides[1], self.strides[0]],
        }
    }
}

/// Check that `perm` holds every axis `0..N` exactly once.
pub fn check_permutation<const N: usize>(perm: &[usize; N]) -> Result<()> {
    let mut seen = [false; N];
    for &p in perm {
        if p >= N || seen[p] {
            return Err(StructureError::InvalidAxis { axis: p, rank: N });
        }
        seen[p] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Extent2d, Extent3d, Index2d, Index3d, Range2d, Stride2d};

    #[test]
    fn test_row_major_strides() {
        assert_eq!(Order2d::row_major(&Extent2d::new(3, 4)).strides(), [4, 1]);
        assert_eq!(
            Order3d::row_major(&Extent3d::new(2, 3, 4)).strides(),
            [12, 4, 1]
        );
        assert_eq!(Order1d::row_major(&crate::Extent1d::new(9)).strides(), [1]);
    }

    #[test]
    fn test_offset() {
        let order = Order2d::row_major(&Extent2d::new(3, 4));
        assert_eq!(order.offset(&Index2d::new(0, 0)), 0);
        assert_eq!(order.offset(&Index2d::new(1, 2)), 6);
        assert_eq!(order.offset(&Index2d::new(2, 3)), 11);

        let order = Order3d::row_major(&Extent3d::new(2, 3, 4));
        assert_eq!(order.offset(&Index3d::new(1, 2, 3)), 23);
    }

    #[test]
    fn test_with_range_shifts_base() {
        let order = Order2d::row_major(&Extent2d::new(3, 4));
        let sub = order.with_range(&Range2d::new(Index2d::new(1, 1), Extent2d::new(2, 2)));
        assert_eq!(sub.base(), 5);
        assert_eq!(sub.strides(), order.strides());
        assert_eq!(sub.offset(&Index2d::new(1, 1)), order.offset(&Index2d::new(2, 2)));
    }

    #[test]
    fn test_with_stride_multiplies() {
        let order = Order2d::new(3, [4, 1]);
        let sub = order.with_stride(&Stride2d::new(2, 3).unwrap());
        assert_eq!(sub.base(), 3);
        assert_eq!(sub.strides(), [8, 3]);
    }

    #[test]
    fn test_with_stride_saturates() {
        let order = Order2d::new(0, [4, 1]);
        let sub = order.with_stride(&Stride2d::new(usize::MAX, 1).unwrap());
        assert_eq!(sub.strides(), [usize::MAX, 1]);
        assert_eq!(sub.offset(&Index2d::new(0, 3)), 3);
    }

    #[test]
    fn test_index_inverts_offset() {
        let order = Order3d::row_major(&Extent3d::new(2, 3, 4));
        for offset in 0..24 {
            let index = order.index(offset).unwrap();
            assert_eq!(order.offset(&index), offset);
        }
        assert_eq!(order.index(23), Some(Index3d::new(1, 2, 3)));

        let order = Order2d::new(5, [1, 4]);
        assert_eq!(order.index(5 + 4 * 2 + 3), Some(Index2d::new(3, 2)));
        assert_eq!(order.index(4), None);

        let strided = Order2d::new(1, [8, 3]);
        assert_eq!(strided.index(1 + 8 + 6), Some(Index2d::new(1, 2)));
        assert_eq!(strided.index(1 + 8 + 2), None);
    }

    #[test]
    fn test_index_with_broadcast() {
        let order = Order2d::new(2, [0, 1]);
        assert_eq!(order.index(5), Some(Index2d::new(0, 3)));
    }

    #[test]
    fn test_transpose_involutive() {
        let order = Order2d::new(7, [5, 1]);
        assert_eq!(order.transpose().strides(), [1, 5]);
        assert_eq!(order.transpose().transpose(), order);
    }

    #[test]
    fn test_permute() {
        let order = Order3d::new(0, [12, 4, 1]);
        assert_eq!(order.permute(&[2, 0, 1]).unwrap().strides(), [1, 12, 4]);
        assert!(matches!(
            order.permute(&[0, 0, 1]),
            Err(StructureError::InvalidAxis { axis: 0, rank: 3 })
        ));
        assert!(order.permute(&[0, 1, 3]).is_err());
    }

    #[test]
    fn test_broadcast_stride() {
        let order = Order2d::new(2, [0, 1]);
        assert_eq!(order.offset(&Index2d::new(0, 1)), 3);
        assert_eq!(order.offset(&Index2d::new(5, 1)), 3);
    }
}
