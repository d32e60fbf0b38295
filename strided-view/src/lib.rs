//! Strided arrays, views and scalars usable as lazy expression operands.
//!
//! # Core Types
//!
//! - [`StridedView`]: Dynamic-rank strided view over borrowed data
//! - [`StridedArray`]: Owned strided multidimensional array
//! - [`Scalar`]: 0-dimensional operand that broadcasts to any shape
//!
//! Every type here implements [`strided_traits::Expression`], so it can be
//! indexed with trailing-axis broadcasting and traversed with either a
//! per-axis stepper or, for dense layouts, a linear storage cursor.
//!
//! # Example
//!
//! ```rust
//! use strided_traits::Expression;
//! use strided_view::StridedArray;
//!
//! let a = StridedArray::<f64>::from_fn_row_major(&[2, 3], |idx| (idx[0] * 10 + idx[1]) as f64);
//! assert_eq!(a.get(&[1, 2]), 12.0);
//!
//! // Broadcast (3,) into a (2, 3) target.
//! let mut shape = vec![2, 3];
//! let b = StridedArray::<f64>::row_major(&[3]);
//! assert!(b.broadcast_shape(&mut shape));
//! ```

mod scalar;
mod stepper;
mod view;

// ============================================================================
// Operand types
// ============================================================================
pub use scalar::{Scalar, ScalarCursor, ScalarStepper};
pub use stepper::{ViewCursor, ViewStepper};
pub use view::{
    col_major_strides, dense_strides, row_major_strides, StridedArray, StridedView,
};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided array operations.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Operand shapes cannot be broadcast to a common shape.
    #[error("operands cannot be broadcast together (folded shape {shape:?})")]
    BroadcastMismatch { shape: Vec<usize> },

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// Integer overflow while computing array offset.
    #[error("offset overflow while computing pointer")]
    OffsetOverflow,
}

/// Result type for strided array operations.
pub type Result<T> = std::result::Result<T, StridedError>;
