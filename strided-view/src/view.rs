//! Dynamic-rank strided arrays and views.
//!
//! - [`StridedView`]: Borrowed dynamic-rank strided view
//! - [`StridedArray`]: Owned strided multidimensional array
//!
//! Both are operands of lazy expressions: they implement
//! [`Expression`] with trailing-axis broadcasting, a per-axis
//! [`ViewStepper`] and a memory-order [`ViewCursor`].

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use strided_traits::{broadcast_into_shape, strides_match, Expression, Layout};

use crate::stepper::{ViewCursor, ViewStepper};
use crate::{Result, StridedError};

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate that all accessed offsets stay within `[0, len)`.
fn validate_bounds(len: usize, dims: &[usize], strides: &[isize], offset: isize) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(StridedError::StrideLengthMismatch);
    }
    // Empty array - no access needed
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = stride
                .checked_mul(dim as isize - 1)
                .ok_or(StridedError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(StridedError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(StridedError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset < 0 {
        return Err(StridedError::OffsetOverflow);
    }
    if max_offset as usize >= len {
        return Err(StridedError::OffsetOverflow);
    }
    Ok(())
}

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1] * dims[i - 1] as isize;
    }
    strides
}

/// Compute row-major strides (last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Dense strides for `dims` in `layout`.
pub fn dense_strides(dims: &[usize], layout: Layout) -> Vec<isize> {
    match layout {
        Layout::RowMajor => row_major_strides(dims),
        Layout::ColMajor => col_major_strides(dims),
    }
}

/// Buffer offset of `indices`, after dropping surplus leading indices.
///
/// An extent-1 axis accepts any index and always reads position 0, so an
/// index into the broadcast shape addresses the right element.
#[inline]
fn element_offset(dims: &[usize], strides: &[isize], offset: isize, indices: &[usize]) -> isize {
    let indices = &indices[indices.len().saturating_sub(dims.len())..];
    assert_eq!(indices.len(), dims.len(), "wrong number of indices");
    let mut idx = offset;
    for (i, &index) in indices.iter().enumerate() {
        if dims[i] == 1 {
            continue;
        }
        assert!(
            index < dims[i],
            "index {} out of bounds for dim {}",
            index,
            dims[i]
        );
        idx += index as isize * strides[i];
    }
    idx
}

/// True if the `dims`/`strides` pair describes a dense block in either order.
fn is_dense(dims: &[usize], strides: &[isize]) -> bool {
    [Layout::RowMajor, Layout::ColMajor].iter().any(|&layout| {
        let mut expected = 1isize;
        let mut visit = |i: usize| {
            if dims[i] <= 1 {
                return true;
            }
            let ok = strides[i] == expected;
            expected *= dims[i] as isize;
            ok
        };
        match layout {
            Layout::RowMajor => (0..dims.len()).rev().all(&mut visit),
            Layout::ColMajor => (0..dims.len()).all(&mut visit),
        }
    })
}

// ============================================================================
// StridedView
// ============================================================================

/// Dynamic-rank immutable strided view over borrowed data.
pub struct StridedView<'a, T> {
    data: &'a [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedView<'a, T> {
    /// Create a new immutable strided view from a borrowed slice.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    /// Create a view without bounds validation.
    ///
    /// Accessing an element whose offset falls outside `data` panics on the
    /// slice index.
    pub fn new_unchecked(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Self {
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// True if the view covers a dense block in row- or column-major order.
    pub fn is_contiguous(&self) -> bool {
        is_dense(&self.dims, &self.strides)
    }

    /// Permute dimensions.
    pub fn permute(&self, perm: &[usize]) -> Result<StridedView<'a, T>> {
        let rank = self.dims.len();
        if perm.len() != rank {
            return Err(StridedError::RankMismatch(perm.len(), rank));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(StridedError::InvalidAxis { axis: p, rank });
            }
            seen[p] = true;
        }
        let new_dims: Vec<usize> = perm.iter().map(|&p| self.dims[p]).collect();
        let new_strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(new_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }

    /// Broadcast this view to a target shape of the same rank.
    ///
    /// Size-1 dimensions are expanded (stride set to 0) to match target.
    pub fn broadcast(&self, target_dims: &[usize]) -> Result<StridedView<'a, T>> {
        if self.dims.len() != target_dims.len() {
            return Err(StridedError::RankMismatch(
                self.dims.len(),
                target_dims.len(),
            ));
        }
        let mut new_strides = Vec::with_capacity(self.dims.len());
        for i in 0..self.dims.len() {
            if self.dims[i] == target_dims[i] {
                new_strides.push(self.strides[i]);
            } else if self.dims[i] == 1 {
                new_strides.push(0);
            } else {
                return Err(StridedError::ShapeMismatch(
                    self.dims.to_vec(),
                    target_dims.to_vec(),
                ));
            }
        }
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(target_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }
}

impl<T: Copy> StridedView<'_, T> {
    /// Get an element.
    ///
    /// # Panics
    /// Panics if an index is out of bounds or too few indices are given.
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[element_offset(&self.dims, &self.strides, self.offset, indices) as usize]
    }
}

impl<'v, T: Copy> Expression for StridedView<'v, T> {
    type Value = T;
    type Stepper<'s>
        = ViewStepper<'s, T>
    where
        Self: 's;
    type Cursor<'s>
        = ViewCursor<'s, T>
    where
        Self: 's;

    #[inline]
    fn dimension(&self) -> usize {
        self.dims.len()
    }

    fn shape(&self) -> Vec<usize> {
        self.dims.to_vec()
    }

    #[inline]
    fn at(&self, indices: &[usize]) -> T {
        self.get(indices)
    }

    fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
        broadcast_into_shape(&self.dims, shape)
    }

    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
        self.is_contiguous() && strides_match(&self.dims, &self.strides, strides)
    }

    fn stepper_begin(&self, shape: &[usize]) -> ViewStepper<'_, T> {
        ViewStepper::begin(self.data, &self.dims, &self.strides, self.offset, shape)
    }

    fn stepper_end(&self, shape: &[usize]) -> ViewStepper<'_, T> {
        ViewStepper::end(self.data, &self.dims, &self.strides, self.offset, shape)
    }

    fn storage_begin(&self) -> ViewCursor<'_, T> {
        ViewCursor::new(self.data, self.offset as usize)
    }

    fn storage_end(&self) -> ViewCursor<'_, T> {
        ViewCursor::new(self.data, self.offset as usize + self.len())
    }
}

// ============================================================================
// StridedArray
// ============================================================================

/// Owned strided multidimensional array.
///
/// Supports both row-major (C default) and column-major layouts.
pub struct StridedArray<T> {
    data: Vec<T>,
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: Clone> Clone for StridedArray<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: Clone + Default> StridedArray<T> {
    /// Create a row-major array filled with `Default` values.
    pub fn row_major(dims: &[usize]) -> Self {
        Self::filled(dims, Layout::RowMajor)
    }

    /// Create a column-major array filled with `Default` values.
    pub fn col_major(dims: &[usize]) -> Self {
        Self::filled(dims, Layout::ColMajor)
    }

    fn filled(dims: &[usize], layout: Layout) -> Self {
        let total: usize = dims.iter().product();
        Self {
            data: vec![T::default(); total],
            dims: Arc::from(dims),
            strides: Arc::from(dense_strides(dims, layout)),
            offset: 0,
        }
    }
}

impl<T> StridedArray<T> {
    /// Create a column-major array with values produced by a function.
    ///
    /// The function is called with indices in column-major iteration order.
    pub fn from_fn_col_major(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total: usize = dims.iter().product();
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in 0..rank {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(col_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create a row-major array with values produced by a function.
    ///
    /// The function is called with indices in row-major iteration order.
    pub fn from_fn_row_major(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total: usize = dims.iter().product();
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in (0..rank).rev() {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        }
    }

    /// Wrap a dense row-major buffer.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        let total: usize = dims.iter().product();
        if data.len() != total {
            return Err(StridedError::ShapeMismatch(vec![data.len()], dims.to_vec()));
        }
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        })
    }

    /// Create from raw parts.
    pub fn from_parts(
        data: Vec<T>,
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// True if the array covers a dense block in row- or column-major order.
    pub fn is_contiguous(&self) -> bool {
        is_dense(&self.dims, &self.strides)
    }

    /// Create an immutable view over this array.
    pub fn view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }

    /// Buffer offset of `indices` (exactly one index per axis).
    pub(crate) fn offset_of(&self, indices: &[usize]) -> usize {
        element_offset(&self.dims, &self.strides, self.offset, indices) as usize
    }
}

impl<T: Copy> StridedArray<T> {
    /// Get an element by multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[self.offset_of(indices)]
    }

    /// Set an element by multi-dimensional index.
    pub fn set(&mut self, indices: &[usize], value: T) {
        let idx = self.offset_of(indices);
        self.data[idx] = value;
    }
}

impl<T> Index<&[usize]> for StridedArray<T> {
    type Output = T;

    fn index(&self, indices: &[usize]) -> &T {
        &self.data[self.offset_of(indices)]
    }
}

impl<T> IndexMut<&[usize]> for StridedArray<T> {
    fn index_mut(&mut self, indices: &[usize]) -> &mut T {
        let idx = self.offset_of(indices);
        &mut self.data[idx]
    }
}

impl<T: Copy> Expression for StridedArray<T> {
    type Value = T;
    type Stepper<'s>
        = ViewStepper<'s, T>
    where
        Self: 's;
    type Cursor<'s>
        = ViewCursor<'s, T>
    where
        Self: 's;

    #[inline]
    fn dimension(&self) -> usize {
        self.dims.len()
    }

    fn shape(&self) -> Vec<usize> {
        self.dims.to_vec()
    }

    #[inline]
    fn at(&self, indices: &[usize]) -> T {
        self.get(indices)
    }

    fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
        broadcast_into_shape(&self.dims, shape)
    }

    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
        self.is_contiguous() && strides_match(&self.dims, &self.strides, strides)
    }

    fn stepper_begin(&self, shape: &[usize]) -> ViewStepper<'_, T> {
        ViewStepper::begin(&self.data, &self.dims, &self.strides, self.offset, shape)
    }

    fn stepper_end(&self, shape: &[usize]) -> ViewStepper<'_, T> {
        ViewStepper::end(&self.data, &self.dims, &self.strides, self.offset, shape)
    }

    fn storage_begin(&self) -> ViewCursor<'_, T> {
        ViewCursor::new(&self.data, self.offset as usize)
    }

    fn storage_end(&self) -> ViewCursor<'_, T> {
        ViewCursor::new(&self.data, self.offset as usize + self.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
