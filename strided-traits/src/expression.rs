//! The capability contract shared by every operand of a lazy expression.
//!
//! An [`Expression`] is anything that can report a shape, fold that shape into
//! a broadcast target, hand out an element for a multi-index, and produce two
//! kinds of cursors:
//!
//! - a [`Stepper`], advanced independently per axis of a broadcast target
//!   shape (always correct, any layout);
//! - a [`LinearCursor`], advanced one element at a time over the operand's
//!   storage (valid only when [`Expression::is_trivial_broadcast`] holds).
//!
//! Composite expressions implement the same trait, so they can be used as
//! operands of other composite expressions.

use std::sync::Arc;

/// An N-dimensional position cursor advanced independently per axis.
///
/// Axis numbers are expressed in the coordinates of the broadcast target
/// shape the stepper was created for, not in the operand's own coordinates.
/// An operand interprets every request against its own extents: axes it
/// does not have, and axes where its extent is 1, never move it.
pub trait Stepper: Clone + PartialEq {
    /// The value produced on dereference.
    type Item;

    /// Advance `n` positions along axis `dim`.
    fn step(&mut self, dim: usize, n: usize);

    /// Move back `n` positions along axis `dim`.
    fn step_back(&mut self, dim: usize, n: usize);

    /// Return to the start of axis `dim`.
    fn reset(&mut self, dim: usize);

    /// Move to the past-the-end position.
    fn to_end(&mut self);

    /// Value at the current position.
    fn get(&self) -> Self::Item;
}

/// A forward-only cursor over an operand's contiguous storage.
pub trait LinearCursor: Clone + PartialEq {
    /// The value produced on dereference.
    type Item;

    /// Advance to the next element (pre-increment).
    fn advance(&mut self);

    /// Value at the current position.
    fn get(&self) -> Self::Item;

    /// Advance and return the cursor as it was before (post-increment).
    #[inline]
    fn post_advance(&mut self) -> Self {
        let previous = self.clone();
        self.advance();
        previous
    }
}

/// Array-like operand of a lazy expression.
///
/// Shapes are plain extents (`usize`) and strides are signed element offsets
/// (`isize`). The caller owns every shape buffer passed in.
pub trait Expression {
    /// Element type produced by indexing and by both cursor kinds.
    type Value;

    /// General N-dimensional cursor.
    type Stepper<'s>: Stepper<Item = Self::Value>
    where
        Self: 's;

    /// Fast-path linear cursor.
    type Cursor<'s>: LinearCursor<Item = Self::Value>
    where
        Self: 's;

    /// Number of axes.
    fn dimension(&self) -> usize;

    /// Extent of every axis.
    ///
    /// The default folds [`Expression::broadcast_shape`] into an all-ones
    /// buffer of length [`Expression::dimension`].
    fn shape(&self) -> Vec<usize> {
        let mut shape = vec![1; self.dimension()];
        self.broadcast_shape(&mut shape);
        shape
    }

    /// Element at `indices`.
    ///
    /// `indices.len()` must be at least [`Expression::dimension`]; surplus
    /// leading indices are ignored (trailing-axis alignment).
    fn at(&self, indices: &[usize]) -> Self::Value;

    /// Fold this operand's shape into `shape`, aligned to its trailing axes.
    ///
    /// Returns `false` if the shapes are incompatible. The buffer is still
    /// updated for every compatible axis.
    fn broadcast_shape(&self, shape: &mut [usize]) -> bool;

    /// Whether this operand's storage layout matches `strides` exactly, which
    /// permits traversal with [`Expression::storage_begin`].
    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool;

    /// Stepper at the origin of the broadcast target `shape`.
    fn stepper_begin(&self, shape: &[usize]) -> Self::Stepper<'_>;

    /// Stepper at the past-the-end position of the broadcast target `shape`.
    fn stepper_end(&self, shape: &[usize]) -> Self::Stepper<'_>;

    /// Linear cursor at the first stored element.
    fn storage_begin(&self) -> Self::Cursor<'_>;

    /// Linear cursor past the last stored element.
    fn storage_end(&self) -> Self::Cursor<'_>;
}

impl<E: Expression + ?Sized> Expression for &E {
    type Value = E::Value;
    type Stepper<'s>
        = E::Stepper<'s>
    where
        Self: 's;
    type Cursor<'s>
        = E::Cursor<'s>
    where
        Self: 's;

    #[inline]
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    #[inline]
    fn shape(&self) -> Vec<usize> {
        (**self).shape()
    }

    #[inline]
    fn at(&self, indices: &[usize]) -> Self::Value {
        (**self).at(indices)
    }

    #[inline]
    fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
        (**self).broadcast_shape(shape)
    }

    #[inline]
    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
        (**self).is_trivial_broadcast(strides)
    }

    #[inline]
    fn stepper_begin(&self, shape: &[usize]) -> Self::Stepper<'_> {
        (**self).stepper_begin(shape)
    }

    #[inline]
    fn stepper_end(&self, shape: &[usize]) -> Self::Stepper<'_> {
        (**self).stepper_end(shape)
    }

    #[inline]
    fn storage_begin(&self) -> Self::Cursor<'_> {
        (**self).storage_begin()
    }

    #[inline]
    fn storage_end(&self) -> Self::Cursor<'_> {
        (**self).storage_end()
    }
}

impl<E: Expression + ?Sized> Expression for Arc<E> {
    type Value = E::Value;
    type Stepper<'s>
        = E::Stepper<'s>
    where
        Self: 's;
    type Cursor<'s>
        = E::Cursor<'s>
    where
        Self: 's;

    #[inline]
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    #[inline]
    fn shape(&self) -> Vec<usize> {
        (**self).shape()
    }

    #[inline]
    fn at(&self, indices: &[usize]) -> Self::Value {
        (**self).at(indices)
    }

    #[inline]
    fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
        (**self).broadcast_shape(shape)
    }

    #[inline]
    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
        (**self).is_trivial_broadcast(strides)
    }

    #[inline]
    fn stepper_begin(&self, shape: &[usize]) -> Self::Stepper<'_> {
        (**self).stepper_begin(shape)
    }

    #[inline]
    fn stepper_end(&self, shape: &[usize]) -> Self::Stepper<'_> {
        (**self).stepper_end(shape)
    }

    #[inline]
    fn storage_begin(&self) -> Self::Cursor<'_> {
        (**self).storage_begin()
    }

    #[inline]
    fn storage_end(&self) -> Self::Cursor<'_> {
        (**self).storage_end()
    }
}
