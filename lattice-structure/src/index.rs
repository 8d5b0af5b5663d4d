//! Logical element coordinates.

use std::fmt;

/// A logical position inside a lattice, one coordinate per dimension.
///
/// Dimensions are numbered `[value]` for rank 1, `[row, col]` for rank 2 and
/// `[slice, row, col]` for rank 3. Coordinates are not checked at
/// construction; a [`Structure`](crate::Structure) checks them against its
/// extent when they are resolved through the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Index<const N: usize>([usize; N]);

pub type Index1d = Index<1>;
pub type Index2d = Index<2>;
pub type Index3d = Index<3>;

impl<const N: usize> Index<N> {
    /// The origin: every coordinate is zero.
    pub const ZERO: Self = Self([0; N]);

    #[inline]
    pub const fn from_array(coords: [usize; N]) -> Self {
        Self(coords)
    }

    #[inline]
    pub const fn to_array(self) -> [usize; N] {
        self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions.
    #[inline]
    pub const fn rank(&self) -> usize {
        N
    }

    /// Coordinate of dimension `dim`.
    ///
    /// # Panics
    /// Panics if `dim >= N`.
    #[inline]
    pub fn at(&self, dim: usize) -> usize {
        self.0[dim]
    }

    /// Component-wise sum, `None` on overflow.
    pub fn checked_add(self, other: Index<N>) -> Option<Self> {
        let mut coords = self.0;
        for (c, o) in coords.iter_mut().zip(other.0) {
            *c = c.checked_add(o)?;
        }
        Some(Self(coords))
    }
}

impl Index<1> {
    #[inline]
    pub const fn new(value: usize) -> Self {
        Self([value])
    }

    #[inline]
    pub const fn value(&self) -> usize {
        self.0[0]
    }
}

impl Index<2> {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self([row, col])
    }

    #[inline]
    pub const fn row(&self) -> usize {
        self.0[0]
    }

    #[inline]
    pub const fn col(&self) -> usize {
        self.0[1]
    }
}

impl Index<3> {
    #[inline]
    pub const fn new(slice: usize, row: usize, col: usize) -> Self {
        Self([slice, row, col])
    }

    #[inline]
    pub const fn slice(&self) -> usize {
        self.0[0]
    }

    #[inline]
    pub const fn row(&self) -> usize {
        self.0[1]
    }

    #[inline]
    pub const fn col(&self) -> usize {
        self.0[2]
    }
}

impl<const N: usize> Default for Index<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[usize; N]> for Index<N> {
    fn from(coords: [usize; N]) -> Self {
        Self(coords)
    }
}

impl<const N: usize> From<Index<N>> for [usize; N] {
    fn from(index: Index<N>) -> Self {
        index.0
    }
}

impl<const N: usize> AsRef<[usize]> for Index<N> {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl<const N: usize> fmt::Display for Index<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_accessors() {
        let idx = Index3d::new(1, 2, 3);
        assert_eq!(idx.slice(), 1);
        assert_eq!(idx.row(), 2);
        assert_eq!(idx.col(), 3);
        assert_eq!(idx.to_array(), [1, 2, 3]);
        assert_eq!(Index2d::new(4, 5).col(), 5);
        assert_eq!(Index1d::new(7).value(), 7);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Index2d::new(1, 2), Index2d::from_array([1, 2]));
        assert_ne!(Index2d::new(1, 2), Index2d::new(2, 1));
        assert_eq!(Index2d::default(), Index2d::ZERO);
    }

    #[test]
    fn test_checked_add() {
        let a = Index2d::new(1, 2);
        assert_eq!(a.checked_add(Index2d::new(3, 4)), Some(Index2d::new(4, 6)));
        assert_eq!(a.checked_add(Index2d::new(usize::MAX, 0)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Index3d::new(1, 2, 3).to_string(), "[1, 2, 3]");
    }
}
