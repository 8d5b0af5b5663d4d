//! Rank-1 lattices.

use lattice_structure::Index;

use crate::lattice::{ElemOf, Lattice};
use crate::storage::{Storage, StorageMut};

impl<S: Storage> Lattice<S, 1> {
    #[inline]
    pub fn len(&self) -> usize {
        self.extent().len()
    }

    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> ElemOf<S> {
        self.get_at(&Index::<1>::new(index))
    }
}

impl<S: StorageMut> Lattice<S, 1> {
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&mut self, index: usize, value: ElemOf<S>) {
        self.set_at(&Index::<1>::new(index), value);
    }
}
