//! Axis-aligned sub-regions.

use std::fmt;

use crate::cursor::{IndexCursor, Indexes};
use crate::extent::Extent;
use crate::index::Index;
use crate::precedence::Precedence;
use crate::{Result, StructureError};

/// A start index plus an extent.
///
/// A range carries no parent context; whether it fits into an extent is
/// checked when a view is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range<const N: usize> {
    start: Index<N>,
    extent: Extent<N>,
}

pub type Range1d = Range<1>;
pub type Range2d = Range<2>;
pub type Range3d = Range<3>;

impl<const N: usize> Range<N> {
    #[inline]
    pub const fn new(start: Index<N>, extent: Extent<N>) -> Self {
        Self { start, extent }
    }

    /// The range covering the whole `extent`, starting at the origin.
    #[inline]
    pub const fn of(extent: Extent<N>) -> Self {
        Self {
            start: Index::ZERO,
            extent,
        }
    }

    /// Build a range from an inclusive `start` and an exclusive `end`.
    ///
    /// # Errors
    /// Returns [`StructureError::InvalidArgument`] if `end < start` in any dimension.
    pub fn from_bounds(start: Index<N>, end: Index<N>) -> Result<Self> {
        let mut sizes = [0usize; N];
        for (d, size) in sizes.iter_mut().enumerate() {
            *size = end.at(d).checked_sub(start.at(d)).ok_or_else(|| {
                StructureError::InvalidArgument(format!(
                    "range end {end} lies before start {start}"
                ))
            })?;
        }
        Ok(Self::new(start, Extent::from_array(sizes)))
    }

    #[inline]
    pub const fn start(&self) -> Index<N> {
        self.start
    }

    #[inline]
    pub const fn extent(&self) -> Extent<N> {
        self.extent
    }

    /// Exclusive end index (saturating).
    pub fn end(&self) -> Index<N> {
        let mut end = self.start.to_array();
        for (e, &size) in end.iter_mut().zip(self.extent.as_slice()) {
            *e = e.saturating_add(size);
        }
        Index::from_array(end)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.extent.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    pub fn contains(&self, index: &Index<N>) -> bool {
        (0..N).all(|d| {
            let i = index.at(d);
            i >= self.start.at(d) && i - self.start.at(d) < self.extent.at(d)
        })
    }

    /// The same extent moved by `by`.
    pub fn translate(&self, by: Index<N>) -> Option<Self> {
        Some(Self::new(self.start.checked_add(by)?, self.extent))
    }

    /// A forward cursor over this range.
    pub fn cursor(&self, precedence: Precedence<N>) -> IndexCursor<N> {
        IndexCursor::forward(self, precedence)
    }

    /// Iterate the indexes of this range in row-major order.
    pub fn indexes(&self) -> Indexes<N> {
        Indexes::new(self.cursor(Precedence::row_major()))
    }
}

impl<const N: usize> From<Extent<N>> for Range<N> {
    fn from(extent: Extent<N>) -> Self {
        Self::of(extent)
    }
}

impl<const N: usize> IntoIterator for Range<N> {
    type Item = Index<N>;
    type IntoIter = Indexes<N>;

    fn into_iter(self) -> Indexes<N> {
        self.indexes()
    }
}

impl<const N: usize> IntoIterator for &Range<N> {
    type Item = Index<N>;
    type IntoIter = Indexes<N>;

    fn into_iter(self) -> Indexes<N> {
        self.indexes()
    }
}

impl<const N: usize> fmt::Display for Range<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.end();
        write!(f, "[")?;
        for d in 0..N {
            if d > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}..{}", self.start.at(d), end.at(d))?;
        }
        write!(f, "]")
    }
}
