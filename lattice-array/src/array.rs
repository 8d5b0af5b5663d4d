//! The storage contract shared by all backends.

use std::fmt::Debug;

use num_traits::Zero;

use crate::{ArrayError, Result};

/// Element types storable in a lattice.
///
/// `zero()` is the value of every element a fresh array starts with, and the
/// value a sparse array does not store.
pub trait Element: Copy + PartialEq + Debug + Zero {}

impl<T> Element for T where T: Copy + PartialEq + Debug + Zero {}

/// A fixed-length sequence of elements addressed by flat offset.
///
/// `get` and `set` behave like slice indexing and panic on an offset
/// `>= len()`. Use [`try_get`](Array::try_get) / [`try_set`](Array::try_set)
/// for checked access.
pub trait Array: Sized {
    type Elem: Element;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, offset: usize) -> Self::Elem;

    fn set(&mut self, offset: usize, value: Self::Elem);

    /// A new array of the same kind holding `[start, start + len)`.
    fn copy_range(&self, start: usize, len: usize) -> Result<Self>;

    /// A new zero-filled array of the same kind with length `len`.
    fn like(&self, len: usize) -> Result<Self>;

    fn try_get(&self, offset: usize) -> Result<Self::Elem> {
        check_offset(offset, self.len())?;
        Ok(self.get(offset))
    }

    fn try_set(&mut self, offset: usize, value: Self::Elem) -> Result<()> {
        check_offset(offset, self.len())?;
        self.set(offset, value);
        Ok(())
    }
}

#[inline]
pub(crate) fn check_offset(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(ArrayError::IndexOutOfBounds { index, len })
    }
}

/// Check that `[start, start + count)` lies inside `[0, len)`.
pub(crate) fn check_range(start: usize, count: usize, len: usize) -> Result<()> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(ArrayError::IndexOutOfBounds {
            index: start.saturating_add(count),
            len,
        }),
    }
}

#[inline]
#[track_caller]
pub(crate) fn bounds_panic(index: usize, len: usize) -> ! {
    panic!("index out of bounds: the len is {len} but the index is {index}")
}
