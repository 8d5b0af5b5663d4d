//! Contiguous storage.

use crate::array::{check_range, Array, Element};
use crate::Result;

/// A flat, contiguous buffer of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray<T> {
    data: Vec<T>,
}

impl<T: Element> DenseArray<T> {
    /// Zero-filled array of length `len`.
    pub fn of_length(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len],
        }
    }

    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Element> Array for DenseArray<T> {
    type Elem = T;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, offset: usize) -> T {
        self.data[offset]
    }

    #[inline]
    fn set(&mut self, offset: usize, value: T) {
        self.data[offset] = value;
    }

    fn copy_range(&self, start: usize, len: usize) -> Result<Self> {
        check_range(start, len, self.data.len())?;
        Ok(Self::from_vec(self.data[start..start + len].to_vec()))
    }

    fn like(&self, len: usize) -> Result<Self> {
        Ok(Self::of_length(len))
    }
}

impl<T: Element> From<Vec<T>> for DenseArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
