//! Shared traits for lazy strided expressions.
//!
//! This crate provides the operand capability contract shared by
//! `strided-view` (concrete arrays, views and scalars) and `strided-lazy`
//! (composite function nodes). External crates can depend on
//! `strided-traits` to make their own array types usable as operands
//! without orphan rule violations.
//!
//! - [`Expression`]: shape, broadcasting, element access and cursor factories
//! - [`Stepper`] / [`LinearCursor`]: the two cursor kinds
//! - [`StepperIter`] / [`LinearIter`]: standard iterators over either cursor
//! - [`broadcast_into_shape`], [`trivial_strides`]: per-operand broadcast rules

pub mod broadcast;
pub mod expression;
pub mod iter;

pub use broadcast::{broadcast_into_shape, broadcast_shapes, strides_match, trivial_strides, Layout};
pub use expression::{Expression, LinearCursor, Stepper};
pub use iter::{LinearIter, StepperIter};
