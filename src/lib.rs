//! Dense and sparse multi-dimensional lattices with aliasing views.
//!
//! A [`Lattice`] pairs a [`Structure`] (extent plus index-to-offset order)
//! with a storage handle. Every element access resolves as
//! `index -> Structure::offset -> Array::get/set`. Views derive a new
//! structure and borrow the parent's array, so writes through a view are
//! visible in the parent without copying a single element.
//!
//! # Core Types
//!
//! - [`Lattice`]: structure + storage, generic over rank `N`
//! - [`DenseGrid2d`], [`SparseGrid2d`], ...: owned lattices per backend and rank
//! - [`Storage`] / [`StorageMut`]: owned arrays, `&A` (read view), `&mut A` (write view)
//! - [`NumericalContext`]: epsilon for tolerant `f64` comparison
//!
//! # Views
//!
//! - [`Lattice::view`] / [`Lattice::view_mut`]: sub-range or strided view
//! - [`Lattice::transpose`], [`Lattice::permute`]: dimension reordering
//! - `row_at`, `col_at`, `slice_at`: lower-rank projections
//! - [`Lattice::copy`]: materialize into an independent dense lattice
//!
//! # Example
//!
//! ```rust
//! use lattices::{DenseGrid2d, Extent2d, Index2d, Range2d};
//!
//! let mut grid = DenseGrid2d::<f64>::dense(Extent2d::new(3, 4)).unwrap();
//! for r in 0..3 {
//!     for c in 0..4 {
//!         grid.set(r, c, (r * 10 + c) as f64);
//!     }
//! }
//!
//! let view = grid
//!     .view(Range2d::new(Index2d::new(1, 1), Extent2d::new(2, 2)))
//!     .unwrap();
//! assert_eq!(view.get(0, 0), 11.0);
//! assert_eq!(view.copy().to_vec(), vec![11.0, 12.0, 21.0, 22.0]);
//! ```
//!
//! # Aliasing
//!
//! ```rust
//! use lattices::{DenseGrid2d, Extent2d};
//!
//! let mut grid = DenseGrid2d::<i32>::dense(Extent2d::new(2, 3)).unwrap();
//! grid.transpose_mut().set(2, 1, 7);
//! assert_eq!(grid.get(1, 2), 7);
//! ```

mod context;
mod grid1d;
mod grid2d;
mod grid3d;
mod lattice;
mod storage;

// ============================================================================
// Lattices
// ============================================================================
pub use context::NumericalContext;
pub use lattice::{
    DenseGrid1d, DenseGrid2d, DenseGrid3d, ElemOf, Lattice, SegmentedGrid1d, SegmentedGrid2d,
    SegmentedGrid3d, SparseGrid1d, SparseGrid2d, SparseGrid3d,
};
pub use storage::{Storage, StorageMut};

// ============================================================================
// Re-exports from lattice-structure and lattice-array
// ============================================================================
pub use lattice_array::{
    Array, ArrayError, DenseArray, Element, IntDoubleMap, IntMap, MapConfig, SegmentedArray,
    SparseArray,
};
pub use lattice_structure::{
    CursorIterable, Extent, Extent1d, Extent2d, Extent3d, Index, Index1d, Index2d, Index3d,
    IndexCursor, Indexes, Order, Precedence, Range, Range1d, Range2d, Range3d, Stride, Stride1d,
    Stride2d, Stride3d, Structure, Structure1d, Structure2d, Structure3d, StructureError, View,
};

// ============================================================================
// Error types
// ============================================================================

/// Errors raised by lattice operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Array(#[from] ArrayError),

    /// Operands or constructor arguments do not fit together.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A structure addresses offsets past the end of its array.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}

/// Result type for lattice operations.
pub type Result<T> = std::result::Result<T, Error>;
