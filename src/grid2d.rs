//! Rank-2 lattices: `[row, col]` access, transposition and row/column views.

use lattice_structure::Index;

use crate::lattice::{ElemOf, Lattice};
use crate::storage::{Storage, StorageMut};
use crate::Result;

impl<S: Storage> Lattice<S, 2> {
    #[inline]
    pub fn rows(&self) -> usize {
        self.extent().rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.extent().cols()
    }

    /// # Panics
    /// Panics if `(row, col)` lies outside the extent.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> ElemOf<S> {
        self.get_at(&Index::<2>::new(row, col))
    }

    /// Read view with rows and columns swapped.
    pub fn transpose(&self) -> Lattice<&S::Array, 2> {
        Lattice::from_parts(self.structure().transpose(), self.array())
    }

    /// Read view of row `row` as a rank-1 lattice.
    pub fn row_at(&self, row: usize) -> Result<Lattice<&S::Array, 1>> {
        Ok(Lattice::from_parts(
            self.structure().project_row(row)?,
            self.array(),
        ))
    }

    /// Read view of column `col` as a rank-1 lattice.
    pub fn col_at(&self, col: usize) -> Result<Lattice<&S::Array, 1>> {
        Ok(Lattice::from_parts(
            self.structure().project_col(col)?,
            self.array(),
        ))
    }
}

impl<S: StorageMut> Lattice<S, 2> {
    /// # Panics
    /// Panics if `(row, col)` lies outside the extent.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: ElemOf<S>) {
        self.set_at(&Index::<2>::new(row, col), value);
    }

    pub fn transpose_mut(&mut self) -> Lattice<&mut S::Array, 2> {
        let structure = self.structure().transpose();
        Lattice::from_parts(structure, self.array_mut())
    }

    pub fn row_at_mut(&mut self, row: usize) -> Result<Lattice<&mut S::Array, 1>> {
        let structure = self.structure().project_row(row)?;
        Ok(Lattice::from_parts(structure, self.array_mut()))
    }

    pub fn col_at_mut(&mut self, col: usize) -> Result<Lattice<&mut S::Array, 1>> {
        let structure = self.structure().project_col(col)?;
        Ok(Lattice::from_parts(structure, self.array_mut()))
    }
}
