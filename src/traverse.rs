//! Checked traversal and materialization.
//!
//! The two cursor kinds of an [`Expression`] are unchecked: they trust the
//! caller to pass a compatible shape and to use the linear cursor only when
//! the layout allows it. The functions here make both decisions:
//!
//! 1. Resolve the broadcast shape and reject incompatible operands.
//! 2. Take the linear path when every operand is dense and laid out exactly
//!    as the row-major strides of that shape.
//! 3. Otherwise walk the shape with steppers.

use smallvec::SmallVec;
use strided_traits::{
    strides_match, trivial_strides, Expression, Layout, LinearIter, StepperIter,
};
use strided_view::{Result, StridedArray, StridedError};

/// Knobs for [`traverse_with`] and [`assign_into_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Allow the linear storage path when the broadcast is trivial.
    pub fast_path: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self { fast_path: true }
    }
}

/// Row-major sequence of an expression's elements.
pub enum Traversal<'e, E: Expression + 'e> {
    /// Every operand is dense with row-major strides.
    Linear(LinearIter<E::Cursor<'e>>),
    /// General per-axis traversal.
    Stepped(StepperIter<E::Stepper<'e>>),
}

impl<'e, E: Expression + 'e> Traversal<'e, E> {
    /// Whether the linear storage path was chosen.
    pub fn is_linear(&self) -> bool {
        matches!(self, Traversal::Linear(_))
    }
}

impl<'e, E: Expression + 'e> Iterator for Traversal<'e, E> {
    type Item = E::Value;

    #[inline]
    fn next(&mut self) -> Option<E::Value> {
        match self {
            Traversal::Linear(it) => it.next(),
            Traversal::Stepped(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Traversal::Linear(it) => it.size_hint(),
            Traversal::Stepped(it) => it.size_hint(),
        }
    }
}

impl<'e, E: Expression + 'e> ExactSizeIterator for Traversal<'e, E> {}

/// Broadcast shape of `expr`, or [`StridedError::BroadcastMismatch`].
pub fn resolve_shape<E: Expression + ?Sized>(expr: &E) -> Result<Vec<usize>> {
    let mut shape = vec![1; expr.dimension()];
    if !expr.broadcast_shape(&mut shape) {
        log::debug!("broadcast failed, folded shape {:?}", shape);
        return Err(StridedError::BroadcastMismatch { shape });
    }
    Ok(shape)
}

/// Traverse `expr` in row-major order with default options.
pub fn traverse<E: Expression>(expr: &E) -> Result<Traversal<'_, E>> {
    traverse_with(expr, &TraversalOptions::default())
}

/// Traverse `expr` in row-major order.
pub fn traverse_with<'e, E: Expression>(
    expr: &'e E,
    options: &TraversalOptions,
) -> Result<Traversal<'e, E>> {
    let shape = resolve_shape(expr)?;
    let len = shape.iter().product();
    if options.fast_path && expr.is_trivial_broadcast(&trivial_strides(&shape, Layout::RowMajor)) {
        log::debug!("traverse {:?}: linear path", shape);
        return Ok(Traversal::Linear(LinearIter::new(expr.storage_begin(), len)));
    }
    log::debug!("traverse {:?}: stepper path", shape);
    Ok(Traversal::Stepped(StepperIter::new(
        expr.stepper_begin(&shape),
        expr.stepper_end(&shape),
        &shape,
    )))
}

/// Evaluate `expr` into a new row-major array.
pub fn evaluate<E>(expr: &E) -> Result<StridedArray<E::Value>>
where
    E: Expression,
{
    let shape = resolve_shape(expr)?;
    let data: Vec<E::Value> = traverse(expr)?.collect();
    StridedArray::from_vec(data, &shape)
}

/// Write `expr` into `dest` with default options.
pub fn assign_into<T, E>(dest: &mut StridedArray<T>, expr: &E) -> Result<()>
where
    T: Copy,
    E: Expression<Value = T>,
{
    assign_into_with(dest, expr, &TraversalOptions::default())
}

/// Write `expr` into `dest`, broadcasting `expr` up to `dest`'s shape.
///
/// `expr` may have fewer axes than `dest` and extent 1 where `dest` is
/// larger. Any other difference is an error and leaves `dest` untouched.
pub fn assign_into_with<T, E>(
    dest: &mut StridedArray<T>,
    expr: &E,
    options: &TraversalOptions,
) -> Result<()>
where
    T: Copy,
    E: Expression<Value = T>,
{
    let dims = dest.dims().to_vec();
    if expr.dimension() > dims.len() {
        return Err(StridedError::RankMismatch(expr.dimension(), dims.len()));
    }
    let mut shape = dims.clone();
    if !expr.broadcast_shape(&mut shape) || shape != dims {
        return Err(StridedError::ShapeMismatch(expr.shape(), dims));
    }

    let len: usize = dims.iter().product();
    let strides = trivial_strides(&dims, Layout::RowMajor);
    if options.fast_path
        && dest.is_contiguous()
        && strides_match(&dims, dest.strides(), &strides)
        && expr.is_trivial_broadcast(&strides)
    {
        log::debug!("assign {:?}: linear path", dims);
        let start = dest.offset() as usize;
        let out = &mut dest.data_mut()[start..start + len];
        for (slot, value) in out.iter_mut().zip(LinearIter::new(expr.storage_begin(), len)) {
            *slot = value;
        }
        return Ok(());
    }

    log::debug!("assign {:?}: stepper path", dims);
    let mut it = StepperIter::new(expr.stepper_begin(&dims), expr.stepper_end(&dims), &dims);
    loop {
        let index: SmallVec<[usize; 8]> = SmallVec::from_slice(it.index());
        match it.next() {
            Some(value) => dest.set(&index, value),
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ops, Function};
    use strided_view::Scalar;

    fn arange(dims: &[usize]) -> StridedArray<i64> {
        let mut next = 0;
        StridedArray::from_fn_row_major(dims, |_| {
            next += 1;
            next - 1
        })
    }

    #[test]
    fn test_dense_operands_take_linear_path() {
        let a = arange(&[2, 3]);
        let b = arange(&[2, 3]);
        let sum = ops::add(&a, &b);
        let it = traverse(&sum).unwrap();
        assert!(it.is_linear());
        assert_eq!(it.len(), 6);
        assert_eq!(it.collect::<Vec<_>>(), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_fast_path_can_be_disabled() {
        let a = arange(&[2, 3]);
        let sum = ops::add(&a, &a);
        let options = TraversalOptions { fast_path: false };
        let it = traverse_with(&sum, &options).unwrap();
        assert!(!it.is_linear());
        assert_eq!(it.collect::<Vec<_>>(), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_broadcast_takes_stepper_path() {
        let a = arange(&[3, 1]);
        let b = arange(&[1, 4]);
        let sum = ops::add(&a, &b);
        let it = traverse(&sum).unwrap();
        assert!(!it.is_linear());
        let values: Vec<i64> = it.collect();
        assert_eq!(values.len(), 12);
        assert_eq!(values[4 + 2], 1 + 2);
    }

    #[test]
    fn test_col_major_operand_takes_stepper_path() {
        let a = StridedArray::from_fn_col_major(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as i64);
        let f = Function::new(|x: i64| x, (&a,));
        let it = traverse(&f).unwrap();
        assert!(!it.is_linear());
        assert_eq!(it.collect::<Vec<_>>(), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_mismatch_is_error() {
        let a = arange(&[2, 3]);
        let b = arange(&[4, 3]);
        let sum = ops::add(&a, &b);
        match traverse(&sum) {
            Err(StridedError::BroadcastMismatch { shape }) => assert_eq!(shape.len(), 2),
            other => panic!("expected broadcast mismatch, got linear={:?}", other.map(|t| t.is_linear())),
        }
    }

    #[test]
    fn test_evaluate() {
        let a = arange(&[2, 1]);
        let b = arange(&[3]);
        let out = evaluate(&ops::mul(&a, &b)).unwrap();
        assert_eq!(out.dims(), &[2, 3]);
        assert_eq!(out.data(), &[0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_evaluate_zero_dim() {
        let out = evaluate(&ops::add(Scalar(1), Scalar(2))).unwrap();
        assert_eq!(out.ndim(), 0);
        assert_eq!(out.data(), &[3]);
    }

    #[test]
    fn test_assign_into_linear() {
        let a = arange(&[2, 2]);
        let mut dest = StridedArray::<i64>::row_major(&[2, 2]);
        assign_into(&mut dest, &ops::mul(&a, Scalar(3))).unwrap();
        assert_eq!(dest.data(), &[0, 3, 6, 9]);
    }

    #[test]
    fn test_assign_into_broadcasts_up() {
        let row = arange(&[3]);
        let mut dest = StridedArray::<i64>::row_major(&[2, 3]);
        assign_into(&mut dest, &ops::map(&row, |x: i64| x + 1)).unwrap();
        assert_eq!(dest.data(), &[1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_assign_into_col_major_dest() {
        let a = arange(&[2, 3]);
        let mut dest = StridedArray::<i64>::col_major(&[2, 3]);
        assign_into(&mut dest, &ops::map(&a, |x: i64| x)).unwrap();
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(dest.get(&[i, j]), a.get(&[i, j]));
            }
        }
    }

    #[test]
    fn test_assign_into_rejects_growth() {
        let a = arange(&[2, 3]);
        let mut dest = StridedArray::<i64>::row_major(&[1, 3]);
        let err = assign_into(&mut dest, &ops::map(&a, |x: i64| x)).unwrap_err();
        assert!(matches!(err, StridedError::ShapeMismatch(_, _)));
        assert_eq!(dest.data(), &[0, 0, 0]);

        let mut flat = StridedArray::<i64>::row_major(&[6]);
        let err = assign_into(&mut flat, &ops::map(&a, |x: i64| x)).unwrap_err();
        assert!(matches!(err, StridedError::RankMismatch(2, 1)));
    }
}
