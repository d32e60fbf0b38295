//! Standard iterators over steppers and linear cursors.
//!
//! [`StepperIter`] turns a stepper pair plus a broadcast shape into a
//! row-major forward sequence (last index varies fastest). [`LinearIter`]
//! walks a linear cursor for a known number of elements.

use smallvec::SmallVec;

use crate::expression::{LinearCursor, Stepper};

type SVec<T> = SmallVec<[T; 8]>;

/// Row-major iterator driven by a [`Stepper`].
///
/// Iteration stops when the current stepper compares equal to the end
/// stepper. Stepping past the last index of the outermost axis moves the
/// stepper to its end position via [`Stepper::to_end`].
#[derive(Debug, Clone)]
pub struct StepperIter<S> {
    current: S,
    end: S,
    index: SVec<usize>,
    shape: SVec<usize>,
    remaining: usize,
}

impl<S: Stepper> StepperIter<S> {
    /// Build an iterator from a begin/end stepper pair created for `shape`.
    pub fn new(begin: S, end: S, shape: &[usize]) -> Self {
        let remaining: usize = shape.iter().product();
        // An empty shape has no positions: start at the end.
        let current = if remaining == 0 { end.clone() } else { begin };
        Self {
            current,
            end,
            index: SmallVec::from_elem(0, shape.len()),
            shape: SmallVec::from_slice(shape),
            remaining,
        }
    }

    /// Multi-index of the next element to be produced.
    #[inline]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Broadcast shape being traversed.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The underlying stepper at the current position.
    #[inline]
    pub fn stepper(&self) -> &S {
        &self.current
    }

    fn increment(&mut self) {
        for dim in (0..self.shape.len()).rev() {
            if self.index[dim] + 1 < self.shape[dim] {
                self.index[dim] += 1;
                self.current.step(dim, 1);
                return;
            }
            self.index[dim] = 0;
            self.current.reset(dim);
        }
        self.index.copy_from_slice(&self.shape);
        self.current.to_end();
    }
}

impl<S: Stepper> Iterator for StepperIter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        if self.current == self.end {
            return None;
        }
        let value = self.current.get();
        self.remaining = self.remaining.saturating_sub(1);
        self.increment();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: Stepper> ExactSizeIterator for StepperIter<S> {}

/// Forward iterator over a [`LinearCursor`], bounded by an element count.
///
/// The count comes from the resolved shape rather than from comparing with
/// an end cursor: a composite whose operands are all 0-dimensional has a
/// begin cursor equal to its end cursor but still holds one element.
#[derive(Debug, Clone)]
pub struct LinearIter<C> {
    cursor: C,
    remaining: usize,
}

impl<C: LinearCursor> LinearIter<C> {
    /// Iterate `len` elements starting at `begin`.
    pub fn new(begin: C, len: usize) -> Self {
        Self {
            cursor: begin,
            remaining: len,
        }
    }
}

impl<C: LinearCursor> Iterator for LinearIter<C> {
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<C::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.cursor.post_advance().get())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<C: LinearCursor> ExactSizeIterator for LinearIter<C> {}
