//! Sparse storage backed by an [`IntMap`].

use crate::array::{bounds_panic, check_offset, check_range, Array, Element};
use crate::map::{IntMap, MapConfig};
use crate::{ArrayError, Result};

const MAX_LEN: u64 = 1 << 32;

/// An array storing only its non-zero elements.
///
/// Reading an offset that was never written returns zero. Writing zero
/// removes the stored entry, so [`nnz`](Self::nnz) always counts non-zero
/// elements. Zero is detected with `==`, so for floats writing `-0.0` also
/// removes the entry and the offset reads back as `+0.0`.
///
/// Offsets are stored as `u32` keys, which caps the length at `2^32`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseArray<T> {
    map: IntMap<T>,
    len: usize,
}

impl<T: Element> SparseArray<T> {
    /// An all-zero array of length `len`.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidArgument`] if `len` exceeds the `u32` key space.
    pub fn of_length(len: usize) -> Result<Self> {
        Self::with_config(len, MapConfig::default())
    }

    /// Like [`of_length`](Self::of_length) with explicit map sizing.
    pub fn with_config(len: usize, config: MapConfig) -> Result<Self> {
        if len as u64 > MAX_LEN {
            return Err(ArrayError::InvalidArgument(format!(
                "sparse array length {len} exceeds {MAX_LEN}"
            )));
        }
        Ok(Self {
            map: IntMap::with_config(config)?,
            len,
        })
    }

    /// Number of stored (non-zero) elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.map.len()
    }

    /// Offsets of the non-zero elements in ascending order.
    pub fn indexes(&self) -> impl Iterator<Item = usize> {
        let mut keys: Vec<usize> = self.map.keys().map(|k| k as usize).collect();
        keys.sort_unstable();
        keys.into_iter()
    }

    /// Visit every non-zero element as `(offset, value)`, in no particular order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, T),
    {
        self.map.for_each(|k, &v| f(k as usize, v));
    }

    /// The underlying map.
    #[inline]
    pub fn map(&self) -> &IntMap<T> {
        &self.map
    }

    /// Set an element, reporting a failed table growth instead of aborting.
    fn store(&mut self, offset: usize, value: T) -> Result<()> {
        let key = offset as u32;
        if value == T::zero() {
            self.map.remove(key);
        } else {
            self.map.try_insert(key, value)?;
        }
        Ok(())
    }
}

impl<T: Element> Array for SparseArray<T> {
    type Elem = T;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, offset: usize) -> T {
        if offset >= self.len {
            bounds_panic(offset, self.len);
        }
        self.map.get(offset as u32).copied().unwrap_or_else(T::zero)
    }

    fn set(&mut self, offset: usize, value: T) {
        if offset >= self.len {
            bounds_panic(offset, self.len);
        }
        let key = offset as u32;
        if value == T::zero() {
            self.map.remove(key);
        } else {
            self.map.insert(key, value);
        }
    }

    /// Copies the non-zero entries of `[start, start + len)`, re-based to offset zero.
    fn copy_range(&self, start: usize, len: usize) -> Result<Self> {
        check_range(start, len, self.len)?;
        let mut copy = Self::of_length(len)?;
        for (k, &v) in self.map.iter() {
            let offset = k as usize;
            if offset >= start && offset - start < len {
                copy.store(offset - start, v)?;
            }
        }
        Ok(copy)
    }

    fn like(&self, len: usize) -> Result<Self> {
        Self::of_length(len)
    }

    fn try_set(&mut self, offset: usize, value: T) -> Result<()> {
        check_offset(offset, self.len)?;
        self.store(offset, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_zero() {
        let mut a = SparseArray::<f64>::of_length(1000).unwrap();
        a.set(500, 2.5);
        assert_eq!(a.get(500), 2.5);
        assert_eq!(a.get(501), 0.0);
        assert_eq!(a.indexes().collect::<Vec<_>>(), vec![500]);
        assert_eq!(a.nnz(), 1);
    }

    #[test]
    fn test_setting_zero_removes() {
        let mut a = SparseArray::<i32>::of_length(10).unwrap();
        a.set(3, 5);
        a.set(3, 0);
        assert_eq!(a.nnz(), 0);
        assert_eq!(a.get(3), 0);
        a.set(4, 0);
        assert_eq!(a.nnz(), 0);
    }

    #[test]
    fn test_negative_zero_removes() {
        let mut a = SparseArray::<f64>::of_length(4).unwrap();
        a.set(1, 1.5);
        a.set(1, -0.0);
        assert_eq!(a.nnz(), 0);
        assert!(a.get(1).is_sign_positive());
        a.set(2, -0.0);
        assert_eq!(a.indexes().count(), 0);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_get_past_len_panics() {
        let a = SparseArray::<f64>::of_length(10).unwrap();
        a.get(10);
    }

    #[test]
    fn test_try_access() {
        let mut a = SparseArray::<f64>::of_length(10).unwrap();
        assert!(matches!(
            a.try_set(10, 1.0),
            Err(ArrayError::IndexOutOfBounds { index: 10, len: 10 })
        ));
        a.try_set(9, 2.0).unwrap();
        assert_eq!(a.try_get(9).unwrap(), 2.0);
        assert!(a.try_get(10).is_err());
    }

    #[test]
    fn test_length_limit() {
        assert!(SparseArray::<f64>::of_length(MAX_LEN as usize).is_ok());
        assert!(matches!(
            SparseArray::<f64>::of_length(MAX_LEN as usize + 1),
            Err(ArrayError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_indexes_sorted() {
        let mut a = SparseArray::<u8>::of_length(100).unwrap();
        for i in [70, 3, 42, 99, 0] {
            a.set(i, 1);
        }
        assert_eq!(a.indexes().collect::<Vec<_>>(), vec![0, 3, 42, 70, 99]);
    }

    #[test]
    fn test_copy_range_rebases() {
        let mut a = SparseArray::<f64>::of_length(100).unwrap();
        a.set(10, 1.0);
        a.set(20, 2.0);
        a.set(30, 3.0);
        let c = a.copy_range(15, 10).unwrap();
        assert_eq!(c.len(), 10);
        assert_eq!(c.nnz(), 1);
        assert_eq!(c.get(5), 2.0);
        assert!(a.copy_range(95, 10).is_err());
    }

    #[test]
    fn test_for_each_and_like() {
        let mut a = SparseArray::<f64>::of_length(8).unwrap();
        a.set(1, 0.5);
        a.set(6, 1.5);
        let mut total = 0.0;
        a.for_each(|i, v| total += i as f64 * v);
        assert_eq!(total, 9.5);

        let b = a.like(4).unwrap();
        assert_eq!(b.len(), 4);
        assert_eq!(b.nnz(), 0);
    }

    #[test]
    fn test_equality_by_content() {
        let mut a = SparseArray::<f64>::of_length(5).unwrap();
        let mut b = SparseArray::<f64>::of_length(5).unwrap();
        a.set(1, 1.0);
        a.set(2, 2.0);
        a.set(2, 0.0);
        b.set(1, 1.0);
        assert_eq!(a, b);
    }
}
