//! Storage handles a lattice can hold.
//!
//! Owning a backend makes a lattice the owner of its elements. Holding `&A`
//! or `&mut A` makes it a view that aliases somebody else's array; the
//! borrow rules then guarantee that no two writers share an array.

use lattice_array::{Array, DenseArray, Element, SegmentedArray, SparseArray};

/// Read access to the array behind a lattice.
pub trait Storage {
    type Array: Array;

    fn array(&self) -> &Self::Array;
}

/// Write access to the array behind a lattice.
pub trait StorageMut: Storage {
    fn array_mut(&mut self) -> &mut Self::Array;
}

macro_rules! impl_owned_storage {
    ($($backend:ident),* $(,)?) => {
        $(
            impl<T: Element> Storage for $backend<T> {
                type Array = Self;

                #[inline]
                fn array(&self) -> &Self {
                    self
                }
            }

            impl<T: Element> StorageMut for $backend<T> {
                #[inline]
                fn array_mut(&mut self) -> &mut Self {
                    self
                }
            }
        )*
    };
}

impl_owned_storage!(DenseArray, SegmentedArray, SparseArray);

impl<A: Array> Storage for &A {
    type Array = A;

    #[inline]
    fn array(&self) -> &A {
        self
    }
}

impl<A: Array> Storage for &mut A {
    type Array = A;

    #[inline]
    fn array(&self) -> &A {
        self
    }
}

impl<A: Array> StorageMut for &mut A {
    #[inline]
    fn array_mut(&mut self) -> &mut A {
        self
    }
}
