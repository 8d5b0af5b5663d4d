//! Subsampling steps.

use std::fmt;

use crate::{Result, StructureError};

/// A positive step per dimension, used to derive subsampled views.
///
/// Storage strides inside an [`Order`](crate::Order) are plain `usize`
/// values and may be zero; a `Stride` never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stride<const N: usize>([usize; N]);

pub type Stride1d = Stride<1>;
pub type Stride2d = Stride<2>;
pub type Stride3d = Stride<3>;

impl<const N: usize> Stride<N> {
    /// Step one in every dimension.
    pub const UNIT: Self = Self([1; N]);

    /// # Errors
    /// Returns [`StructureError::InvalidArgument`] if any step is smaller than one.
    pub fn from_array(steps: [usize; N]) -> Result<Self> {
        if steps.iter().any(|&s| s < 1) {
            return Err(StructureError::InvalidArgument(format!(
                "stride must be positive: {steps:?}"
            )));
        }
        Ok(Self(steps))
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
    pub fn at(&self, dim: usize) -> usize {
        self.0[dim]
    }
}

impl Stride<1> {
    pub fn new(value: usize) -> Result<Self> {
        Self::from_array([value])
    }
}

impl Stride<2> {
    pub fn new(row: usize, col: usize) -> Result<Self> {
        Self::from_array([row, col])
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

impl Stride<3> {
    pub fn new(slice: usize, row: usize, col: usize) -> Result<Self> {
        Self::from_array([slice, row, col])
    }
}

impl<const N: usize> Default for Stride<N> {
    fn default() -> Self {
        Self::UNIT
    }
}

impl<const N: usize> fmt::Display for Stride<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stride{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_stride() {
        let s = Stride2d::new(2, 3).unwrap();
        assert_eq!(s.row(), 2);
        assert_eq!(s.col(), 3);
        assert_eq!(s.to_string(), "Stride[2, 3]");
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(matches!(
            Stride2d::new(0, 1),
            Err(StructureError::InvalidArgument(_))
        ));
        assert!(Stride3d::new(1, 1, 0).is_err());
    }
}
