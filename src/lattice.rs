//! The rank-generic lattice type and its bulk operations.

use std::fmt;

use lattice_array::{Array, DenseArray, Element, SegmentedArray, SparseArray};
use lattice_structure::{Extent, Index, Indexes, Precedence, Range, Structure, View};

use crate::context::NumericalContext;
use crate::storage::{Storage, StorageMut};
use crate::{Error, Result};

/// Element type of the array behind storage `S`.
pub type ElemOf<S> = <<S as Storage>::Array as Array>::Elem;

/// A [`Structure`] over a storage handle.
///
/// `S` decides ownership: an owned backend (`DenseArray<T>`, ...) or a
/// borrowed one (`&A`, `&mut A`) for views. All operations address elements
/// through the structure, so they behave identically on owned lattices and
/// on views of any order.
#[derive(Clone)]
pub struct Lattice<S, const N: usize> {
    structure: Structure<N>,
    storage: S,
}

pub type DenseGrid1d<T> = Lattice<DenseArray<T>, 1>;
pub type DenseGrid2d<T> = Lattice<DenseArray<T>, 2>;
pub type DenseGrid3d<T> = Lattice<DenseArray<T>, 3>;
pub type SegmentedGrid1d<T> = Lattice<SegmentedArray<T>, 1>;
pub type SegmentedGrid2d<T> = Lattice<SegmentedArray<T>, 2>;
pub type SegmentedGrid3d<T> = Lattice<SegmentedArray<T>, 3>;
pub type SparseGrid1d<T> = Lattice<SparseArray<T>, 1>;
pub type SparseGrid2d<T> = Lattice<SparseArray<T>, 2>;
pub type SparseGrid3d<T> = Lattice<SparseArray<T>, 3>;

fn checked_size<const N: usize>(extent: &Extent<N>) -> Result<usize> {
    extent.checked_size().ok_or_else(|| {
        Error::InvalidArgument(format!("extent {extent} overflows the addressable size"))
    })
}

fn ensure_same_extent<const N: usize>(a: &Extent<N>, b: &Extent<N>) -> Result<()> {
    if a == b {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("extent mismatch: {a} != {b}")))
    }
}

/// Visit every index of `structure` in row-major order together with its
/// storage offset.
#[inline]
fn walk<const N: usize, F>(structure: &Structure<N>, mut f: F)
where
    F: FnMut(&[usize; N], usize),
{
    let order = structure.order();
    let mut cursor = Range::of(structure.extent()).cursor(Precedence::row_major());
    let mut index = [0usize; N];
    while cursor.next(&mut index) {
        f(&index, order.offset_of(&index));
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl<T: Element, const N: usize> Lattice<DenseArray<T>, N> {
    /// Zero-filled dense lattice.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the extent's size overflows `usize`.
    pub fn dense(extent: Extent<N>) -> Result<Self> {
        let size = checked_size(&extent)?;
        Ok(Self {
            structure: Structure::new(extent),
            storage: DenseArray::of_length(size),
        })
    }

    /// Dense lattice over `values` in row-major order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `values.len()` differs from the
    /// extent's size.
    pub fn from_values(extent: Extent<N>, values: Vec<T>) -> Result<Self> {
        let size = checked_size(&extent)?;
        if values.len() != size {
            return Err(Error::InvalidArgument(format!(
                "{} values do not fill extent {extent} of size {size}",
                values.len()
            )));
        }
        Ok(Self {
            structure: Structure::new(extent),
            storage: DenseArray::from_vec(values),
        })
    }
}

impl<T: Element, const N: usize> Lattice<SegmentedArray<T>, N> {
    /// Zero-filled lattice over a [`SegmentedArray`].
    pub fn segmented(extent: Extent<N>) -> Result<Self> {
        let size = checked_size(&extent)?;
        Ok(Self {
            structure: Structure::new(extent),
            storage: SegmentedArray::of_length(size),
        })
    }
}

impl<T: Element, const N: usize> Lattice<SparseArray<T>, N> {
    /// Zero-filled lattice storing only non-zero elements.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the extent's size overflows or
    /// exceeds the sparse key space.
    pub fn sparse(extent: Extent<N>) -> Result<Self> {
        let size = checked_size(&extent)?;
        Ok(Self {
            structure: Structure::new(extent),
            storage: SparseArray::of_length(size)?,
        })
    }
}

impl<S: Storage, const N: usize> Lattice<S, N> {
    /// Lattice over existing storage.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `structure` addresses an offset past
    /// the end of the array.
    pub fn new(structure: Structure<N>, storage: S) -> Result<Self> {
        let len = storage.array().len();
        if !structure.is_empty() {
            match structure.max_offset() {
                Some(max) if max < len => {}
                _ => {
                    return Err(Error::OutOfBounds(format!(
                        "structure {structure:?} exceeds array length {len}"
                    )))
                }
            }
        }
        Ok(Self { structure, storage })
    }
}

impl<S, const N: usize> Lattice<S, N> {
    /// Pair a structure with storage it is already known to fit.
    #[inline]
    pub(crate) fn from_parts(structure: Structure<N>, storage: S) -> Self {
        Self { structure, storage }
    }
}

// ============================================================================
// Accessors and element access
// ============================================================================

impl<S: Storage, const N: usize> Lattice<S, N> {
    #[inline]
    pub fn structure(&self) -> Structure<N> {
        self.structure
    }

    #[inline]
    pub fn extent(&self) -> Extent<N> {
        self.structure.extent()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.structure.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    #[inline]
    pub fn array(&self) -> &S::Array {
        self.storage.array()
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// # Panics
    /// Panics if `index` lies outside the extent.
    #[inline]
    pub fn get_at(&self, index: &Index<N>) -> ElemOf<S> {
        if !self.structure.contains(index) {
            index_panic(index, &self.extent());
        }
        self.array().get(self.structure.offset(index))
    }

    pub fn try_get_at(&self, index: &Index<N>) -> Result<ElemOf<S>> {
        self.structure.check_index(index)?;
        Ok(self.array().try_get(self.structure.offset(index))?)
    }
}

impl<S: StorageMut, const N: usize> Lattice<S, N> {
    #[inline]
    pub fn array_mut(&mut self) -> &mut S::Array {
        self.storage.array_mut()
    }

    /// # Panics
    /// Panics if `index` lies outside the extent.
    #[inline]
    pub fn set_at(&mut self, index: &Index<N>, value: ElemOf<S>) {
        if !self.structure.contains(index) {
            index_panic(index, &self.extent());
        }
        let offset = self.structure.offset(index);
        self.storage.array_mut().set(offset, value);
    }

    pub fn try_set_at(&mut self, index: &Index<N>, value: ElemOf<S>) -> Result<()> {
        self.structure.check_index(index)?;
        let offset = self.structure.offset(index);
        Ok(self.storage.array_mut().try_set(offset, value)?)
    }
}

#[cold]
#[track_caller]
fn index_panic<const N: usize>(index: &Index<N>, extent: &Extent<N>) -> ! {
    panic!("index {index} out of bounds for extent {extent}")
}

// ============================================================================
// Views
// ============================================================================

impl<S: Storage, const N: usize> Lattice<S, N> {
    /// Read view over the whole lattice.
    #[inline]
    pub fn as_view(&self) -> Lattice<&S::Array, N> {
        Lattice::from_parts(self.structure, self.array())
    }

    /// Read view over a sub-range or a strided subsample.
    ///
    /// # Errors
    /// Returns [`Error::Structure`] if a range does not fit into the extent.
    pub fn view<V: View<N>>(&self, view: V) -> Result<Lattice<&S::Array, N>> {
        Ok(Lattice::from_parts(self.structure.view(view)?, self.array()))
    }

    /// Consume this lattice into a view of itself, keeping the storage handle.
    pub fn into_view<V: View<N>>(self, view: V) -> Result<Self> {
        Ok(Self {
            structure: self.structure.view(view)?,
            storage: self.storage,
        })
    }

    /// Read view with reordered dimensions; new dimension `i` is old dimension `perm[i]`.
    pub fn permute(&self, perm: [usize; N]) -> Result<Lattice<&S::Array, N>> {
        Ok(Lattice::from_parts(self.structure.permute(perm)?, self.array()))
    }
}

impl<S: StorageMut, const N: usize> Lattice<S, N> {
    #[inline]
    pub fn as_view_mut(&mut self) -> Lattice<&mut S::Array, N> {
        Lattice::from_parts(self.structure, self.storage.array_mut())
    }

    /// Write view over a sub-range or a strided subsample.
    pub fn view_mut<V: View<N>>(&mut self, view: V) -> Result<Lattice<&mut S::Array, N>> {
        let structure = self.structure.view(view)?;
        Ok(Lattice::from_parts(structure, self.storage.array_mut()))
    }

    pub fn permute_mut(&mut self, perm: [usize; N]) -> Result<Lattice<&mut S::Array, N>> {
        let structure = self.structure.permute(perm)?;
        Ok(Lattice::from_parts(structure, self.storage.array_mut()))
    }
}

// ============================================================================
// Materialization
// ============================================================================

impl<S: Storage, const N: usize> Lattice<S, N> {
    /// Independent dense row-major copy of this lattice.
    pub fn copy(&self) -> Lattice<DenseArray<ElemOf<S>>, N> {
        tracing::trace!(extent = %self.extent(), "lattice_copy");
        Lattice::from_parts(
            Structure::new(self.extent()),
            DenseArray::from_vec(self.to_vec()),
        )
    }

    /// Independent dense copy of `range`.
    pub fn copy_range(&self, range: &Range<N>) -> Result<Lattice<DenseArray<ElemOf<S>>, N>> {
        Ok(self.view(*range)?.copy())
    }

    /// Zero-filled lattice of the same extent on the same kind of backend.
    pub fn like(&self) -> Result<Lattice<S::Array, N>> {
        tracing::trace!(extent = %self.extent(), "lattice_like");
        let array = self.array().like(self.size())?;
        Ok(Lattice::from_parts(self.structure.like(), array))
    }

    /// Elements in row-major order.
    pub fn to_vec(&self) -> Vec<ElemOf<S>> {
        let array = self.array();
        let mut values = Vec::with_capacity(self.size());
        walk(&self.structure, |_, offset| values.push(array.get(offset)));
        values
    }
}

// ============================================================================
// Bulk operations
// ============================================================================

impl<S: Storage, const N: usize> Lattice<S, N> {
    /// Indexes of the extent in row-major order.
    pub fn indexes(&self) -> Indexes<N> {
        Range::of(self.extent()).indexes()
    }

    /// Call `f` with every index in row-major order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Index<N>),
    {
        walk(&self.structure, |index, _| f(Index::from_array(*index)));
    }

    /// Call `f` with every index and its value in row-major order.
    pub fn for_each_value<F>(&self, mut f: F)
    where
        F: FnMut(Index<N>, ElemOf<S>),
    {
        let array = self.array();
        walk(&self.structure, |index, offset| {
            f(Index::from_array(*index), array.get(offset))
        });
    }

    /// Map every element with `map_fn` and fold the results with `reduce_fn`.
    /// Returns `None` for an empty lattice.
    pub fn reduce<M, R>(&self, mut map_fn: M, mut reduce_fn: R) -> Option<ElemOf<S>>
    where
        M: FnMut(ElemOf<S>) -> ElemOf<S>,
        R: FnMut(ElemOf<S>, ElemOf<S>) -> ElemOf<S>,
    {
        let array = self.array();
        let mut acc = None;
        walk(&self.structure, |_, offset| {
            let mapped = map_fn(array.get(offset));
            acc = Some(match acc.take() {
                Some(current) => reduce_fn(current, mapped),
                None => mapped,
            });
        });
        acc
    }

    /// Sum of all elements, zero for an empty lattice.
    pub fn sum(&self) -> ElemOf<S> {
        self.reduce(|v| v, |a, b| a + b)
            .unwrap_or_else(num_traits::Zero::zero)
    }

    pub fn all_match<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(ElemOf<S>) -> bool,
    {
        let array = self.array();
        let mut matched = true;
        let mut cursor = Range::of(self.extent()).cursor(Precedence::row_major());
        let mut index = [0usize; N];
        while matched && cursor.next(&mut index) {
            matched = predicate(array.get(self.structure.order().offset_of(&index)));
        }
        matched
    }

    pub fn any_match<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(ElemOf<S>) -> bool,
    {
        !self.all_match(|v| !predicate(v))
    }
}

impl<S, const N: usize> Lattice<S, N>
where
    S: Storage,
    S::Array: Array<Elem = f64>,
{
    /// Element-wise comparison within the epsilon of `context`.
    pub fn equals_within<S2>(&self, other: &Lattice<S2, N>, context: &NumericalContext) -> bool
    where
        S2: Storage,
        S2::Array: Array<Elem = f64>,
    {
        if self.extent() != other.extent() {
            return false;
        }
        let (a, b) = (self.array(), other.array());
        let order = other.structure.order();
        let mut equal = true;
        walk(&self.structure, |index, offset| {
            equal = equal && context.equals(a.get(offset), b.get(order.offset_of(index)));
        });
        equal
    }
}

impl<S: StorageMut, const N: usize> Lattice<S, N> {
    pub fn fill(&mut self, value: ElemOf<S>) {
        let array = self.storage.array_mut();
        walk(&self.structure, |_, offset| array.set(offset, value));
    }

    /// Replace every element `v` with `f(v)`.
    pub fn update<F>(&mut self, mut f: F)
    where
        F: FnMut(ElemOf<S>) -> ElemOf<S>,
    {
        let array = self.storage.array_mut();
        walk(&self.structure, |_, offset| {
            let value = array.get(offset);
            array.set(offset, f(value));
        });
    }

    /// Copy the elements of `other` into this lattice.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the extents differ.
    pub fn assign<S2>(&mut self, other: &Lattice<S2, N>) -> Result<()>
    where
        S2: Storage,
        S2::Array: Array<Elem = ElemOf<S>>,
    {
        self.zip_assign(other, |_, b| b)
    }

    /// Replace every element `a` with `f(a, b)`, `b` being the element of
    /// `other` at the same index.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the extents differ.
    pub fn zip_assign<S2, F>(&mut self, other: &Lattice<S2, N>, mut f: F) -> Result<()>
    where
        S2: Storage,
        S2::Array: Array<Elem = ElemOf<S>>,
        F: FnMut(ElemOf<S>, ElemOf<S>) -> ElemOf<S>,
    {
        ensure_same_extent(&self.extent(), &other.extent())?;
        let src = other.array();
        let src_order = other.structure.order();
        let dst = self.storage.array_mut();
        walk(&self.structure, |index, offset| {
            let value = f(dst.get(offset), src.get(src_order.offset_of(index)));
            dst.set(offset, value);
        });
        Ok(())
    }

    /// Exchange the elements of this lattice and `other`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the extents differ.
    pub fn swap<S2>(&mut self, other: &mut Lattice<S2, N>) -> Result<()>
    where
        S2: StorageMut,
        S2::Array: Array<Elem = ElemOf<S>>,
    {
        ensure_same_extent(&self.extent(), &other.extent())?;
        let other_order = other.structure.order();
        let b = other.storage.array_mut();
        let a = self.storage.array_mut();
        walk(&self.structure, |index, offset| {
            let other_offset = other_order.offset_of(index);
            let tmp = a.get(offset);
            a.set(offset, b.get(other_offset));
            b.set(other_offset, tmp);
        });
        Ok(())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl<S1, S2, const N: usize> PartialEq<Lattice<S2, N>> for Lattice<S1, N>
where
    S1: Storage,
    S2: Storage,
    S2::Array: Array<Elem = ElemOf<S1>>,
{
    fn eq(&self, other: &Lattice<S2, N>) -> bool {
        if self.extent() != other.extent() {
            return false;
        }
        let (a, b) = (self.array(), other.array());
        let order = other.structure.order();
        let mut equal = true;
        walk(&self.structure, |index, offset| {
            equal = equal && a.get(offset) == b.get(order.offset_of(index));
        });
        equal
    }
}

impl<S: Storage, const N: usize> fmt::Debug for Lattice<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lattice")
            .field("extent", &self.extent())
            .field("values", &self.to_vec())
            .finish()
    }
}
