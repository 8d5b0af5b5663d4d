//! Two-level block storage.

use crate::array::{bounds_panic, check_range, Array, Element};
use crate::{ArrayError, Result};

/// Segment size exponent used by [`SegmentedArray::of_length`]: 64Ki elements.
pub const DEFAULT_SEGMENT_BITS: u32 = 16;

const MAX_SEGMENT_BITS: u32 = 30;

/// Elements stored in fixed-size segments of `2^bits` elements.
///
/// An offset resolves to `(offset >> bits, offset & mask)`. Only the last
/// segment may be shorter than `2^bits`.
#[derive(Debug, Clone)]
pub struct SegmentedArray<T> {
    segments: Vec<Box<[T]>>,
    bits: u32,
    len: usize,
}

impl<T: Element> SegmentedArray<T> {
    /// Zero-filled array of length `len` with [`DEFAULT_SEGMENT_BITS`].
    pub fn of_length(len: usize) -> Self {
        Self::zeroed(len, DEFAULT_SEGMENT_BITS)
    }

    /// Zero-filled array of length `len` with segments of `2^bits` elements.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidArgument`] if `bits` is not in `1..=30`.
    pub fn with_segment_bits(len: usize, bits: u32) -> Result<Self> {
        if !(1..=MAX_SEGMENT_BITS).contains(&bits) {
            return Err(ArrayError::InvalidArgument(format!(
                "segment bits must be in 1..={MAX_SEGMENT_BITS}, got {bits}"
            )));
        }
        Ok(Self::zeroed(len, bits))
    }

    fn zeroed(len: usize, bits: u32) -> Self {
        let size = 1usize << bits;
        let mut segments = Vec::with_capacity(len.div_ceil(size));
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(size);
            segments.push(vec![T::zero(); n].into_boxed_slice());
            remaining -= n;
        }
        Self {
            segments,
            bits,
            len,
        }
    }

    #[inline]
    pub fn segment_bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Elements in offset order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.segments.iter().flat_map(|s| s.iter().copied())
    }

    #[inline]
    fn locate(&self, offset: usize) -> (usize, usize) {
        (offset >> self.bits, offset & ((1usize << self.bits) - 1))
    }
}

impl<T: Element> Array for SegmentedArray<T> {
    type Elem = T;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, offset: usize) -> T {
        if offset >= self.len {
            bounds_panic(offset, self.len);
        }
        let (segment, inner) = self.locate(offset);
        self.segments[segment][inner]
    }

    #[inline]
    fn set(&mut self, offset: usize, value: T) {
        if offset >= self.len {
            bounds_panic(offset, self.len);
        }
        let (segment, inner) = self.locate(offset);
        self.segments[segment][inner] = value;
    }

    fn copy_range(&self, start: usize, len: usize) -> Result<Self> {
        check_range(start, len, self.len)?;
        let mut copy = Self::zeroed(len, self.bits);
        for i in 0..len {
            copy.set(i, self.get(start + i));
        }
        Ok(copy)
    }

    fn like(&self, len: usize) -> Result<Self> {
        Ok(Self::zeroed(len, self.bits))
    }
}

impl<T: Element> PartialEq for SegmentedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}
