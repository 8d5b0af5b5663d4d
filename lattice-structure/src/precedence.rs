//! Dimension precedence for traversal.

use std::cmp::Ordering;
use std::fmt;

use crate::{Result, StructureError};

/// Which dimension varies fastest during traversal.
///
/// `order()[0]` is the fastest-varying dimension and `order()[N - 1]` the
/// slowest. [`Precedence::row_major`] (last dimension fastest) is the
/// canonical order used by all bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precedence<const N: usize>([usize; N]);

impl<const N: usize> Precedence<N> {
    /// Last dimension fastest: `[N-1, ..., 1, 0]`.
    pub fn row_major() -> Self {
        let mut order = [0usize; N];
        for (i, o) in order.iter_mut().enumerate() {
            *o = N - 1 - i;
        }
        Self(order)
    }

    /// First dimension fastest: `[0, 1, ..., N-1]`.
    pub fn col_major() -> Self {
        let mut order = [0usize; N];
        for (i, o) in order.iter_mut().enumerate() {
            *o = i;
        }
        Self(order)
    }

    /// Explicit precedence, fastest dimension first.
    ///
    /// # Errors
    /// Returns [`StructureError::InvalidArgument`] if `order` is not a
    /// permutation of `0..N`.
    pub fn of(order: [usize; N]) -> Result<Self> {
        let mut seen = [false; N];
        for &d in &order {
            if d >= N || seen[d] {
                return Err(StructureError::InvalidArgument(format!(
                    "precedence must be a permutation: {order:?}"
                )));
            }
            seen[d] = true;
        }
        Ok(Self(order))
    }

    #[inline]
    pub fn at(&self, i: usize) -> usize {
        self.0[i]
    }

    #[inline]
    pub const fn order(&self) -> [usize; N] {
        self.0
    }

    /// Compare two coordinate tuples in traversal order: the slowest
    /// dimension decides first.
    pub fn compare(&self, a: &[usize; N], b: &[usize; N]) -> Ordering {
        self.0
            .iter()
            .rev()
            .map(|&d| a[d].cmp(&b[d]))
            .find(|c| c.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<const N: usize> Default for Precedence<N> {
    fn default() -> Self {
        Self::row_major()
    }
}

impl<const N: usize> fmt::Display for Precedence<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
