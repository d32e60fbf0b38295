//! Cursors over strided storage.
//!
//! [`ViewStepper`] follows a broadcast target shape axis by axis, ignoring
//! the leading target axes the operand does not have and every axis where
//! the operand's extent is 1. [`ViewCursor`] walks the underlying buffer in
//! memory order and is only meaningful for dense layouts.

use smallvec::SmallVec;
use strided_traits::{LinearCursor, Stepper};

type SVec<T> = SmallVec<[T; 8]>;

/// Per-axis stepper over a strided buffer.
pub struct ViewStepper<'a, T> {
    data: &'a [T],
    dims: &'a [usize],
    strides: &'a [isize],
    /// Number of leading target axes the operand does not have.
    lead: usize,
    base: isize,
    pos: isize,
    index: SVec<usize>,
    at_end: bool,
}

impl<'a, T> ViewStepper<'a, T> {
    /// Stepper at the origin of `shape`.
    pub(crate) fn begin(
        data: &'a [T],
        dims: &'a [usize],
        strides: &'a [isize],
        offset: isize,
        shape: &[usize],
    ) -> Self {
        Self {
            data,
            dims,
            strides,
            lead: shape.len().saturating_sub(dims.len()),
            base: offset,
            pos: offset,
            index: SmallVec::from_elem(0, dims.len()),
            at_end: false,
        }
    }

    /// Stepper at the past-the-end position of `shape`.
    pub(crate) fn end(
        data: &'a [T],
        dims: &'a [usize],
        strides: &'a [isize],
        offset: isize,
        shape: &[usize],
    ) -> Self {
        let mut stepper = Self::begin(data, dims, strides, offset, shape);
        stepper.mark_end();
        stepper
    }

    /// Rewind to the origin and flag the past-the-end position.
    fn mark_end(&mut self) {
        self.index.iter_mut().for_each(|i| *i = 0);
        self.pos = self.base;
        self.at_end = true;
    }

    /// Own axis for target axis `dim`, if the operand moves along it.
    #[inline]
    fn own_axis(&self, dim: usize) -> Option<usize> {
        let axis = dim.checked_sub(self.lead)?;
        (self.dims[axis] != 1).then_some(axis)
    }
}

impl<T> Clone for ViewStepper<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims,
            strides: self.strides,
            lead: self.lead,
            base: self.base,
            pos: self.pos,
            index: self.index.clone(),
            at_end: self.at_end,
        }
    }
}

impl<T> PartialEq for ViewStepper<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr())
            && self.pos == other.pos
            && self.at_end == other.at_end
    }
}

impl<T> std::fmt::Debug for ViewStepper<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStepper")
            .field("pos", &self.pos)
            .field("index", &self.index)
            .field("at_end", &self.at_end)
            .finish()
    }
}

impl<T: Copy> Stepper for ViewStepper<'_, T> {
    type Item = T;

    #[inline]
    fn step(&mut self, dim: usize, n: usize) {
        if let Some(axis) = self.own_axis(dim) {
            self.index[axis] += n;
            self.pos += n as isize * self.strides[axis];
        }
    }

    #[inline]
    fn step_back(&mut self, dim: usize, n: usize) {
        if let Some(axis) = self.own_axis(dim) {
            self.index[axis] -= n;
            self.pos -= n as isize * self.strides[axis];
        }
    }

    #[inline]
    fn reset(&mut self, dim: usize) {
        if let Some(axis) = self.own_axis(dim) {
            self.pos -= self.index[axis] as isize * self.strides[axis];
            self.index[axis] = 0;
        }
    }

    fn to_end(&mut self) {
        self.mark_end();
    }

    #[inline]
    fn get(&self) -> T {
        self.data[self.pos as usize]
    }
}

/// Forward cursor over a dense buffer in memory order.
pub struct ViewCursor<'a, T> {
    data: &'a [T],
    pos: usize,
}

impl<'a, T> ViewCursor<'a, T> {
    pub(crate) fn new(data: &'a [T], pos: usize) -> Self {
        Self { data, pos }
    }
}

impl<T> Clone for ViewCursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            pos: self.pos,
        }
    }
}

impl<T> PartialEq for ViewCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr()) && self.pos == other.pos
    }
}

impl<T> std::fmt::Debug for ViewCursor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCursor").field("pos", &self.pos).finish()
    }
}

impl<T: Copy> LinearCursor for ViewCursor<'_, T> {
    type Item = T;

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    fn get(&self) -> T {
        self.data[self.pos]
    }
}
