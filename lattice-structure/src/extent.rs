//! Per-dimension sizes.

use std::fmt;

use crate::index::Index;

/// The shape of a lattice region: one size per dimension.
///
/// A zero in any dimension makes the extent empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent<const N: usize>([usize; N]);

pub type Extent1d = Extent<1>;
pub type Extent2d = Extent<2>;
pub type Extent3d = Extent<3>;

impl<const N: usize> Extent<N> {
    #[inline]
    pub const fn from_array(sizes: [usize; N]) -> Self {
        Self(sizes)
    }

    #[inline]
    pub const fn to_array(self) -> [usize; N] {
        self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub const fn rank(&self) -> usize {
        N
    }

    /// Size of dimension `dim`.
    ///
    /// # Panics
    /// Panics if `dim >= N`.
    #[inline]
    pub fn at(&self, dim: usize) -> usize {
        self.0[dim]
    }

    /// Number of elements, `None` if the product overflows `usize`.
    pub fn checked_size(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Number of elements.
    ///
    /// Saturates on overflow; such an extent can never be backed by storage,
    /// and lattice constructors reject it through [`checked_size`](Self::checked_size).
    #[inline]
    pub fn size(&self) -> usize {
        self.0.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().any(|&d| d == 0)
    }

    /// Whether `index` lies inside `[0, extent)` in every dimension.
    #[inline]
    pub fn contains(&self, index: &Index<N>) -> bool {
        index
            .as_slice()
            .iter()
            .zip(self.0.iter())
            .all(|(&i, &d)| i < d)
    }
}

impl Extent<1> {
    #[inline]
    pub const fn new(len: usize) -> Self {
        Self([len])
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0[0]
    }
}

impl Extent<2> {
    #[inline]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self([rows, cols])
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.0[0]
    }

    #[inline]
    pub const fn cols(&self) -> usize {
        self.0[1]
    }
}

impl Extent<3> {
    #[inline]
    pub const fn new(slices: usize, rows: usize, cols: usize) -> Self {
        Self([slices, rows, cols])
    }

    #[inline]
    pub const fn slices(&self) -> usize {
        self.0[0]
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.0[1]
    }

    #[inline]
    pub const fn cols(&self) -> usize {
        self.0[2]
    }
}

impl<const N: usize> From<[usize; N]> for Extent<N> {
    fn from(sizes: [usize; N]) -> Self {
        Self(sizes)
    }
}

impl<const N: usize> fmt::Display for Extent<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(Extent2d::new(3, 4).size(), 12);
        assert_eq!(Extent3d::new(2, 3, 4).size(), 24);
        assert_eq!(Extent1d::new(5).size(), 5);
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        let e = Extent2d::new(0, 4);
        assert_eq!(e.size(), 0);
        assert!(e.is_empty());
        assert!(!Extent2d::new(1, 1).is_empty());
    }

    #[test]
    fn test_checked_size_overflow() {
        assert_eq!(Extent2d::new(usize::MAX, 2).checked_size(), None);
        assert_eq!(Extent2d::new(usize::MAX, 2).size(), usize::MAX);
        assert_eq!(Extent2d::new(usize::MAX, 0).checked_size(), Some(0));
    }

    #[test]
    fn test_contains() {
        let e = Extent2d::new(3, 4);
        assert!(e.contains(&Index::<2>::new(2, 3)));
        assert!(!e.contains(&Index::<2>::new(3, 0)));
        assert!(!e.contains(&Index::<2>::new(0, 4)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Extent2d::new(3, 4).to_string(), "[3, 4]");
    }
}
