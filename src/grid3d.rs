//! Rank-3 lattices: `[slice, row, col]` access and plane views.

use lattice_structure::Index;

use crate::lattice::{ElemOf, Lattice};
use crate::storage::{Storage, StorageMut};
use crate::Result;

impl<S: Storage> Lattice<S, 3> {
    #[inline]
    pub fn slices(&self) -> usize {
        self.extent().slices()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.extent().rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.extent().cols()
    }

    /// # Panics
    /// Panics if `(slice, row, col)` lies outside the extent.
    #[inline]
    pub fn get(&self, slice: usize, row: usize, col: usize) -> ElemOf<S> {
        self.get_at(&Index::<3>::new(slice, row, col))
    }

    /// The `[row, col]` plane at `slice`.
    pub fn slice_at(&self, slice: usize) -> Result<Lattice<&S::Array, 2>> {
        Ok(Lattice::from_parts(
            self.structure().project_slice(slice)?,
            self.array(),
        ))
    }

    /// The `[slice, col]` plane at `row`.
    pub fn row_at(&self, row: usize) -> Result<Lattice<&S::Array, 2>> {
        Ok(Lattice::from_parts(
            self.structure().project_row(row)?,
            self.array(),
        ))
    }

    /// The `[slice, row]` plane at `col`.
    pub fn col_at(&self, col: usize) -> Result<Lattice<&S::Array, 2>> {
        Ok(Lattice::from_parts(
            self.structure().project_col(col)?,
            self.array(),
        ))
    }
}

impl<S: StorageMut> Lattice<S, 3> {
    /// # Panics
    /// Panics if `(slice, row, col)` lies outside the extent.
    #[inline]
    pub fn set(&mut self, slice: usize, row: usize, col: usize, value: ElemOf<S>) {
        self.set_at(&Index::<3>::new(slice, row, col), value);
    }

    pub fn slice_at_mut(&mut self, slice: usize) -> Result<Lattice<&mut S::Array, 2>> {
        let structure = self.structure().project_slice(slice)?;
        Ok(Lattice::from_parts(structure, self.array_mut()))
    }

    pub fn row_at_mut(&mut self, row: usize) -> Result<Lattice<&mut S::Array, 2>> {
        let structure = self.structure().project_row(row)?;
        Ok(Lattice::from_parts(structure, self.array_mut()))
    }

    pub fn col_at_mut(&mut self, col: usize) -> Result<Lattice<&mut S::Array, 2>> {
        let structure = self.structure().project_col(col)?;
        Ok(Lattice::from_parts(structure, self.array_mut()))
    }
}
