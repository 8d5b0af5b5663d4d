//! Extent + order pairs and the views derived from them.

use crate::extent::Extent;
use crate::index::Index;
use crate::order::{check_permutation, Order};
use crate::range::Range;
use crate::stride::Stride;
use crate::{Result, StructureError};

/// The addressable shape of a lattice: which logical indexes exist
/// ([`Extent`]) and where they live in storage ([`Order`]).
///
/// Structures are small `Copy` values. Deriving a view returns a new
/// structure and leaves `self` untouched. Two structures are equal when their
/// extents and orders are equal, however they were built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Structure<const N: usize> {
    extent: Extent<N>,
    order: Order<N>,
}

pub type Structure1d = Structure<1>;
pub type Structure2d = Structure<2>;
pub type Structure3d = Structure<3>;

/// A view transformation that can be applied to a [`Structure`].
///
/// Implemented by [`Range`] (sub-region) and [`Stride`] (subsampling), so
/// both go through the single [`Structure::view`] entry point.
pub trait View<const N: usize> {
    fn apply(&self, structure: &Structure<N>) -> Result<Structure<N>>;
}

impl<const N: usize> View<N> for Range<N> {
    fn apply(&self, structure: &Structure<N>) -> Result<Structure<N>> {
        structure.check_range(self)?;
        Ok(Structure {
            extent: self.extent(),
            order: structure.order.with_range(self),
        })
    }
}

impl<const N: usize> View<N> for Stride<N> {
    fn apply(&self, structure: &Structure<N>) -> Result<Structure<N>> {
        let mut sizes = structure.extent.to_array();
        for (size, &step) in sizes.iter_mut().zip(self.as_slice()) {
            *size = size.div_ceil(step);
        }
        Ok(Structure {
            extent: Extent::from_array(sizes),
            order: structure.order.with_stride(self),
        })
    }
}

impl<const N: usize> Structure<N> {
    /// Row-major structure for `extent`.
    pub fn new(extent: Extent<N>) -> Self {
        Self {
            extent,
            order: Order::row_major(&extent),
        }
    }

    /// Structure with an explicit order.
    ///
    /// The caller is responsible for `order` mapping distinct indexes of
    /// `extent` to distinct offsets, unless broadcasting is intended.
    #[inline]
    pub const fn with_order(extent: Extent<N>, order: Order<N>) -> Self {
        Self { extent, order }
    }

    #[inline]
    pub const fn extent(&self) -> Extent<N> {
        self.extent
    }

    #[inline]
    pub const fn order(&self) -> Order<N> {
        self.order
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.extent.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    /// A fresh row-major structure with the same extent.
    pub fn like(&self) -> Self {
        Self::new(self.extent)
    }

    /// Derive a view from a [`Range`] or a [`Stride`].
    ///
    /// # Errors
    /// Returns [`StructureError::OutOfBounds`] if a range does not lie within
    /// [`extent`](Self::extent).
    pub fn view<V: View<N>>(&self, view: V) -> Result<Self> {
        view.apply(self)
    }

    /// Row-major structure for a materialized copy of `range`.
    pub fn copy(&self, range: &Range<N>) -> Result<Self> {
        self.check_range(range)?;
        Ok(Self::new(range.extent()))
    }

    /// Reorder dimensions: new dimension `i` is old dimension `perm[i]`.
    pub fn permute(&self, perm: [usize; N]) -> Result<Self> {
        check_permutation(&perm)?;
        let old = self.extent.to_array();
        let mut sizes = [0usize; N];
        for (size, &p) in sizes.iter_mut().zip(perm.iter()) {
            *size = old[p];
        }
        Ok(Self {
            extent: Extent::from_array(sizes),
            order: self.order.permuted(&perm),
        })
    }

    /// Storage offset of `index`, without a bounds check.
    #[inline]
    pub fn offset(&self, index: &Index<N>) -> usize {
        self.order.offset(index)
    }

    /// Index of the element stored at `offset`, `None` if no index of this
    /// structure addresses it.
    pub fn index(&self, offset: usize) -> Option<Index<N>> {
        self.order
            .index(offset)
            .filter(|index| self.extent.contains(index) && self.order.offset(index) == offset)
    }

    #[inline]
    pub fn contains(&self, index: &Index<N>) -> bool {
        self.extent.contains(index)
    }

    pub fn check_index(&self, index: &Index<N>) -> Result<()> {
        if self.extent.contains(index) {
            Ok(())
        } else {
            Err(StructureError::OutOfBounds(format!(
                "{index} out of bounds {}",
                self.extent
            )))
        }
    }

    pub fn check_range(&self, range: &Range<N>) -> Result<()> {
        let start = range.start();
        let fits = (0..N).all(|d| {
            start
                .at(d)
                .checked_add(range.extent().at(d))
                .is_some_and(|end| end <= self.extent.at(d))
        });
        if fits {
            Ok(())
        } else {
            Err(StructureError::OutOfBounds(format!(
                "{} : {range}",
                self.extent
            )))
        }
    }

    /// Largest storage offset addressed by this structure, `None` if empty.
    pub fn max_offset(&self) -> Option<usize> {
        if self.extent.is_empty() {
            return None;
        }
        let strides = self.order.strides();
        let mut max = self.order.base();
        for (d, &stride) in strides.iter().enumerate() {
            max = max.checked_add((self.extent.at(d) - 1).checked_mul(stride)?)?;
        }
        Some(max)
    }

    fn project_out(&self, dim: usize, index: usize) -> Result<(usize, [usize; N])> {
        if index >= self.extent.at(dim) {
            return Err(StructureError::OutOfBounds(format!(
                "attempted to access {} at index {index} of dimension {dim}",
                self.extent
            )));
        }
        let base = self.order.base() + index * self.order.stride(dim);
        Ok((base, self.order.strides()))
    }
}

impl Structure<2> {
    /// Swap rows and columns in both extent and order.
    #[inline]
    pub const fn transpose(&self) -> Self {
        Self {
            extent: Extent::<2>::new(self.extent.cols(), self.extent.rows()),
            order: self.order.transpose(),
        }
    }

    /// The 1-d structure of row `row`.
    pub fn project_row(&self, row: usize) -> Result<Structure<1>> {
        let (base, strides) = self.project_out(0, row)?;
        Ok(Structure::with_order(
            Extent::<1>::new(self.extent.cols()),
            Order::new(base, [strides[1]]),
        ))
    }

    /// The 1-d structure of column `col`.
    pub fn project_col(&self, col: usize) -> Result<Structure<1>> {
        let (base, strides) = self.project_out(1, col)?;
        Ok(Structure::with_order(
            Extent::<1>::new(self.extent.rows()),
            Order::new(base, [strides[0]]),
        ))
    }
}

impl Structure<3> {
    /// The `[row, col]` plane of slice `slice`.
    pub fn project_slice(&self, slice: usize) -> Result<Structure<2>> {
        let (base, strides) = self.project_out(0, slice)?;
        Ok(Structure::with_order(
            Extent::<2>::new(self.extent.rows(), self.extent.cols()),
            Order::new(base, [strides[1], strides[2]]),
        ))
    }

    /// The `[slice, col]` plane of row `row`.
    pub fn project_row(&self, row: usize) -> Result<Structure<2>> {
        let (base, strides) = self.project_out(1, row)?;
        Ok(Structure::with_order(
            Extent::<2>::new(self.extent.slices(), self.extent.cols()),
            Order::new(base, [strides[0], strides[2]]),
        ))
    }

    /// The `[slice, row]` plane of column `col`.
    pub fn project_col(&self, col: usize) -> Result<Structure<2>> {
        let (base, strides) = self.project_out(2, col)?;
        Ok(Structure::with_order(
            Extent::<2>::new(self.extent.slices(), self.extent.rows()),
            Order::new(base, [strides[0], strides[1]]),
        ))
    }
}

impl<const N: usize> From<Extent<N>> for Structure<N> {
    fn from(extent: Extent<N>) -> Self {
        Self::new(extent)
    }
}
