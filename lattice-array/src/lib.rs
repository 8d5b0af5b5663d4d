//! Flat storage backends for lattices.
//!
//! Every backend implements [`Array`]: a fixed-length sequence of elements
//! addressed by a flat offset. Lattices never look past this trait, so the
//! backends are interchangeable.
//!
//! # Backends
//!
//! - [`DenseArray`]: one contiguous `Vec<T>`
//! - [`SegmentedArray`]: fixed-size blocks of `2^bits` elements, for lengths
//!   too large for one allocation
//! - [`SparseArray`]: only non-zero elements, stored in an [`IntMap`]
//!
//! # Example
//!
//! ```rust
//! use lattice_array::{Array, SparseArray};
//!
//! let mut array = SparseArray::<f64>::of_length(1000).unwrap();
//! array.set(500, 3.14);
//!
//! assert_eq!(array.get(500), 3.14);
//! assert_eq!(array.get(501), 0.0);
//! assert_eq!(array.indexes().collect::<Vec<_>>(), vec![500]);
//! ```

mod array;
mod dense;
mod map;
mod segmented;
mod sparse;

pub use array::{Array, Element};
pub use dense::DenseArray;
pub use map::{IntDoubleMap, IntMap, MapConfig};
pub use segmented::{SegmentedArray, DEFAULT_SEGMENT_BITS};
pub use sparse::SparseArray;

use std::collections::TryReserveError;

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum ArrayError {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing table could not grow.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(#[from] TryReserveError),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, ArrayError>;
