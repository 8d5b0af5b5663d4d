//! Allocation-free traversal of index ranges.
//!
//! [`IndexCursor`] is the hot path used by every bulk operation: it writes the
//! next coordinates into a caller-owned buffer and never allocates.
//! [`Indexes`] and [`CursorIterable`] wrap it in the `Iterator` protocol for
//! convenience.

use std::iter::FusedIterator;

use crate::index::Index;
use crate::precedence::Precedence;
use crate::range::Range;
use crate::{Result, StructureError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Single-pass cursor over the indexes of a [`Range`].
///
/// Indexes are produced lexicographically by the cursor's [`Precedence`]:
/// `order[0]` varies fastest. Once [`next`](Self::next) returns `false` it
/// keeps returning `false`; build a new cursor to traverse again.
#[derive(Debug, Clone)]
pub struct IndexCursor<const N: usize> {
    start: [usize; N],
    /// Exclusive for forward cursors, inclusive for backward ones.
    end: [usize; N],
    order: [usize; N],
    cursor: [usize; N],
    direction: Direction,
    exhausted: bool,
    total: usize,
    emitted: usize,
}

impl<const N: usize> IndexCursor<N> {
    /// Cursor from `range.start()` up to `range.end()`.
    pub fn forward(range: &Range<N>, precedence: Precedence<N>) -> Self {
        let start = range.start().to_array();
        let end = range.end().to_array();
        let total = span(&start, &end);
        Self {
            start,
            end,
            order: precedence.order(),
            cursor: start,
            direction: Direction::Forward,
            exhausted: total == 0,
            total,
            emitted: 0,
        }
    }

    /// Cursor from the last index of `range` down to `range.start()`.
    pub fn backward(range: &Range<N>, precedence: Precedence<N>) -> Self {
        let start = range.start().to_array();
        let mut last = range.end().to_array();
        let total = span(&start, &last);
        for l in last.iter_mut() {
            *l = l.saturating_sub(1);
        }
        Self {
            start,
            end: last,
            order: precedence.order(),
            cursor: last,
            direction: Direction::Backward,
            exhausted: total == 0,
            total,
            emitted: 0,
        }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of indexes not yet produced.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.total - self.emitted
    }

    /// Write the next index into `index` and advance.
    ///
    /// Returns `false`, leaving `index` untouched, once the range is exhausted.
    #[inline]
    pub fn next(&mut self, index: &mut [usize; N]) -> bool {
        if self.exhausted {
            return false;
        }
        *index = self.cursor;
        self.emitted += 1;
        match self.direction {
            Direction::Forward => self.advance(),
            Direction::Backward => self.retreat(),
        }
        true
    }

    /// Like [`next`](Self::next), for buffers of runtime length.
    ///
    /// # Errors
    /// Returns [`StructureError::IllegalState`] if `index` is shorter than the rank.
    pub fn next_into(&mut self, index: &mut [usize]) -> Result<bool> {
        if index.len() < N {
            return Err(StructureError::IllegalState(format!(
                "index buffer of length {} cannot hold rank {N}",
                index.len()
            )));
        }
        let mut buf = [0usize; N];
        let has_next = self.next(&mut buf);
        if has_next {
            index[..N].copy_from_slice(&buf);
        }
        Ok(has_next)
    }

    fn advance(&mut self) {
        for &d in &self.order {
            self.cursor[d] += 1;
            if self.cursor[d] < self.end[d] {
                return;
            }
            self.cursor[d] = self.start[d];
        }
        self.exhausted = true;
    }

    fn retreat(&mut self) {
        for &d in &self.order {
            if self.cursor[d] > self.start[d] {
                self.cursor[d] -= 1;
                return;
            }
            self.cursor[d] = self.end[d];
        }
        self.exhausted = true;
    }
}

/// Iterator adapter yielding owned [`Index`] values from a cursor.
#[derive(Debug, Clone)]
pub struct Indexes<const N: usize> {
    cursor: IndexCursor<N>,
}

impl<const N: usize> Indexes<N> {
    #[inline]
    pub fn new(cursor: IndexCursor<N>) -> Self {
        Self { cursor }
    }
}

impl<const N: usize> Iterator for Indexes<N> {
    type Item = Index<N>;

    #[inline]
    fn next(&mut self) -> Option<Index<N>> {
        let mut buf = [0usize; N];
        if self.cursor.next(&mut buf) {
            Some(Index::from_array(buf))
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl<const N: usize> ExactSizeIterator for Indexes<N> {}

impl<const N: usize> FusedIterator for Indexes<N> {}

/// A restartable index sequence built from a cursor factory.
///
/// Every call to [`iter`](Self::iter) asks the factory for a fresh cursor.
///
/// ```rust
/// use lattice_structure::{CursorIterable, Extent2d, Precedence, Range2d};
///
/// let range = Range2d::of(Extent2d::new(2, 3));
/// let indexes = CursorIterable::new(move || range.cursor(Precedence::col_major()));
///
/// assert_eq!(indexes.iter().count(), 6);
/// assert_eq!(indexes.iter().count(), 6);
/// ```
pub struct CursorIterable<F> {
    factory: F,
}

impl<F, const N: usize> CursorIterable<F>
where
    F: Fn() -> IndexCursor<N>,
{
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn iter(&self) -> Indexes<N> {
        Indexes::new((self.factory)())
    }
}

impl<'a, F, const N: usize> IntoIterator for &'a CursorIterable<F>
where
    F: Fn() -> IndexCursor<N>,
{
    type Item = Index<N>;
    type IntoIter = Indexes<N>;

    fn into_iter(self) -> Indexes<N> {
        self.iter()
    }
}

/// Number of indexes in `[start, end)`, with `end` already clamped to `usize::MAX`.
fn span<const N: usize>(start: &[usize; N], end: &[usize; N]) -> usize {
    start
        .iter()
        .zip(end.iter())
        .fold(1usize, |acc, (&s, &e)| acc.saturating_mul(e - s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Extent1d, Extent2d, Extent3d, Index1d, Index2d, Range1d, Range2d, Range3d};

    fn drain<const N: usize>(mut cursor: IndexCursor<N>) -> Vec<[usize; N]> {
        let mut out = Vec::new();
        let mut buf = [0usize; N];
        while cursor.next(&mut buf) {
            out.push(buf);
        }
        out
    }

    #[test]
    fn test_forward_row_major() {
        let range = Range2d::new(Index2d::new(1, 1), Extent2d::new(2, 3));
        let all = drain(IndexCursor::forward(&range, Precedence::row_major()));
        assert_eq!(
            all,
            vec![[1, 1], [1, 2], [1, 3], [2, 1], [2, 2], [2, 3]]
        );
    }

    #[test]
    fn test_forward_col_major() {
        let range = Range2d::of(Extent2d::new(2, 2));
        let all = drain(IndexCursor::forward(&range, Precedence::col_major()));
        assert_eq!(all, vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
    }

    #[test]
    fn test_backward_reverses_forward() {
        let range = Range3d::new(
            crate::Index3d::new(1, 0, 2),
            Extent3d::new(2, 3, 2),
        );
        let precedence = Precedence::of([1, 2, 0]).unwrap();
        let mut forward = drain(IndexCursor::forward(&range, precedence));
        let backward = drain(IndexCursor::backward(&range, precedence));
        forward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(backward.len(), 12);
    }

    #[test]
    fn test_forward_order_matches_precedence() {
        let range = Range3d::of(Extent3d::new(3, 2, 4));
        let precedence = Precedence::of([2, 0, 1]).unwrap();
        let all = drain(IndexCursor::forward(&range, precedence));
        for pair in all.windows(2) {
            assert_eq!(
                precedence.compare(&pair[0], &pair[1]),
                std::cmp::Ordering::Less
            );
        }
    }

    #[test]
    fn test_exhaustion_is_idempotent() {
        let range = Range1d::new(Index1d::new(3), Extent1d::new(4));
        let mut cursor = range.cursor(Precedence::row_major());
        let mut buf = [0usize; 1];
        for expected in 3..7 {
            assert!(cursor.next(&mut buf));
            assert_eq!(buf, [expected]);
        }
        for _ in 0..5 {
            assert!(!cursor.next(&mut buf));
            assert_eq!(buf, [6]);
        }
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_empty_range() {
        let range = Range2d::of(Extent2d::new(3, 0));
        let mut cursor = IndexCursor::forward(&range, Precedence::row_major());
        assert!(cursor.is_exhausted());
        assert!(!cursor.next(&mut [0, 0]));

        let mut cursor = IndexCursor::backward(&range, Precedence::row_major());
        assert!(!cursor.next(&mut [0, 0]));
    }

    #[test]
    fn test_next_into_short_buffer() {
        let range = Range2d::of(Extent2d::new(2, 2));
        let mut cursor = range.cursor(Precedence::row_major());
        let mut short = [0usize; 1];
        assert!(matches!(
            cursor.next_into(&mut short),
            Err(StructureError::IllegalState(_))
        ));

        let mut long = [9usize; 3];
        assert!(cursor.next_into(&mut long).unwrap());
        assert_eq!(long, [0, 0, 9]);
    }

    #[test]
    fn test_indexes_exact_size() {
        let range = Range2d::of(Extent2d::new(3, 4));
        let mut it = range.indexes();
        assert_eq!(it.len(), 12);
        it.next();
        assert_eq!(it.len(), 11);
        assert_eq!(it.count(), 11);
    }

    #[test]
    fn test_len_matches_yield_at_usize_edge() {
        let range = Range1d::new(Index1d::new(usize::MAX - 2), Extent1d::new(5));
        let it = range.indexes();
        assert_eq!(it.len(), 2);
        let values: Vec<usize> = it.map(|i| i.value()).collect();
        assert_eq!(values, vec![usize::MAX - 2, usize::MAX - 1]);

        let range = Range2d::new(Index2d::new(1, usize::MAX), Extent2d::new(3, 4));
        let mut cursor = IndexCursor::forward(&range, Precedence::row_major());
        assert_eq!(cursor.remaining(), 0);
        assert!(!cursor.next(&mut [0, 0]));

        let range = Range2d::new(Index2d::new(0, usize::MAX - 1), Extent2d::new(2, 3));
        let mut cursor = IndexCursor::backward(&range, Precedence::row_major());
        assert_eq!(cursor.remaining(), 2);
        let mut index = [0usize; 2];
        let mut count = 0;
        while cursor.next(&mut index) {
            count += 1;
        }
        assert_eq!(count, 2);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_cursor_iterable_restarts() {
        let range = Range2d::of(Extent2d::new(2, 2));
        let iterable = CursorIterable::new(move || range.cursor(Precedence::row_major()));
        let first: Vec<_> = iterable.iter().collect();
        let second: Vec<_> = (&iterable).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }
}
