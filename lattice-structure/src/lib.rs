//! Addressing layer for dense and sparse lattices.
//!
//! This crate describes *where* lattice elements live, never *what* they are.
//! A [`Structure`] pairs an [`Extent`] with an [`Order`], the affine map from a
//! logical [`Index`] to a flat storage offset. Views are new structures derived
//! from an existing one; they never touch element storage.
//!
//! # Core Types
//!
//! - [`Index`], [`Extent`], [`Range`], [`Stride`]: rank-generic value types
//!   with `1d`/`2d`/`3d` aliases
//! - [`Order`]: `offset(index) = base + Σ index[d] * stride[d]`
//! - [`Structure`]: extent + order, derives sub-range, strided, transposed and
//!   projected child structures
//! - [`IndexCursor`] / [`Indexes`]: allocation-free canonical traversal
//!
//! # Metadata Transformations
//!
//! These operate only on extent/order and are O(1):
//! - `view(range)`: translated sub-region
//! - `view(stride)`: subsampled region
//! - `transpose`, `permute`: reorder dimensions
//! - `project_row`, `project_col`, `project_slice`: lower-rank projections
//!
//! # Example
//!
//! ```rust
//! use lattice_structure::{Extent2d, Index2d, Range2d, Structure2d};
//!
//! let structure = Structure2d::new(Extent2d::new(3, 4));
//! let view = structure
//!     .view(Range2d::new(Index2d::new(1, 1), Extent2d::new(2, 2)))
//!     .unwrap();
//!
//! assert_eq!(view.offset(&Index2d::new(0, 0)), structure.offset(&Index2d::new(1, 1)));
//! assert_eq!(view.transpose().transpose(), view);
//! ```

mod cursor;
mod extent;
mod index;
mod order;
mod precedence;
mod range;
mod stride;
mod structure;

// ============================================================================
// Value types
// ============================================================================
pub use extent::{Extent, Extent1d, Extent2d, Extent3d};
pub use index::{Index, Index1d, Index2d, Index3d};
pub use range::{Range, Range1d, Range2d, Range3d};
pub use stride::{Stride, Stride1d, Stride2d, Stride3d};

// ============================================================================
// Addressing
// ============================================================================
pub use order::{check_permutation, Order, Order1d, Order2d, Order3d};
pub use structure::{Structure, Structure1d, Structure2d, Structure3d, View};

// ============================================================================
// Traversal
// ============================================================================
pub use cursor::{CursorIterable, IndexCursor, Indexes};
pub use precedence::Precedence;

// ============================================================================
// Error types
// ============================================================================

/// Errors raised while deriving or resolving lattice structures.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// A value type was constructed from invalid components.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A range, projection or index does not fit into an extent.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A cursor was driven in a way it does not support.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Invalid axis index for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },
}

/// Result type for structure operations.
pub type Result<T> = std::result::Result<T, StructureError>;
