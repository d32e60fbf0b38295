//! Lazy elementwise expressions over broadcast strided arrays.
//!
//! A [`Function`] node applies a function elementwise to a tuple of 1 to 6
//! operands without computing anything up front. The operands are broadcast
//! against each other (trailing axes aligned, extent 1 stretches), and every
//! element is produced on demand.
//!
//! # Core Types
//!
//! - [`Function`]: The lazy node, itself an [`Expression`] so nodes nest
//! - [`FunctionStepper`] / [`FunctionCursor`]: Per-axis and linear cursors over a node
//! - [`Closure`]: Owned, borrowed or shared operand holder
//! - [`Vectorizer`]: Factory turning a scalar function into nodes
//!
//! Operands come from [`strided_view`]: [`StridedArray`], [`StridedView`] and
//! [`Scalar`]. Any type implementing [`Expression`] works.
//!
//! # Traversal
//!
//! - [`traverse`], [`traverse_with`]: Checked row-major iteration that takes the
//!   linear storage path when every operand is dense and row-major
//! - [`evaluate`]: Collect a node into a new [`StridedArray`]
//! - [`assign_into`], [`assign_into_with`]: Write a node into an existing array
//!
//! # Example
//!
//! ```rust
//! use strided_lazy::{ops, traverse, Expression, Scalar, StridedArray};
//!
//! let a = StridedArray::from_fn_row_major(&[3, 1], |idx| idx[0] as f64);
//! let b = StridedArray::from_fn_row_major(&[1, 4], |idx| idx[1] as f64);
//!
//! // (a + b) * 2, broadcast to (3, 4)
//! let expr = ops::mul(ops::add(&a, &b), Scalar(2.0));
//! assert_eq!(expr.shape(), vec![3, 4]);
//! assert_eq!(expr.at(&[2, 3]), 10.0);
//!
//! let total: f64 = traverse(&expr).unwrap().sum();
//! assert_eq!(total, 2.0 * (4.0 * 3.0 + 3.0 * 6.0));
//! ```

pub mod access;
mod closure;
mod function;
pub mod operands;
pub mod ops;
mod stepper;
mod traverse;
mod vectorize;

// ============================================================================
// Lazy nodes
// ============================================================================
pub use closure::{Closure, ClosureKind};
pub use function::Function;
pub use operands::{Apply, Operands};
pub use stepper::{FunctionCursor, FunctionStepper};
pub use vectorize::{vectorize, Vectorizer};

// ============================================================================
// Traversal
// ============================================================================
pub use traverse::{
    assign_into, assign_into_with, evaluate, resolve_shape, traverse, traverse_with, Traversal,
    TraversalOptions,
};

// ============================================================================
// Re-exports from strided-traits and strided-view
// ============================================================================
pub use strided_traits::{
    broadcast_into_shape, broadcast_shapes, trivial_strides, Expression, Layout, LinearCursor,
    LinearIter, Stepper, StepperIter,
};
pub use strided_view::{Result, Scalar, StridedArray, StridedError, StridedView};
