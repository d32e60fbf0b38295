//! Lazy elementwise function node.

use strided_traits::{Expression, LinearIter, StepperIter};

use crate::operands::{Apply, Operands};
use crate::stepper::{FunctionCursor, FunctionStepper};

/// A function `f` applied elementwise to a tuple of broadcast operands.
///
/// Nothing is computed when the node is built. Every element is produced on
/// demand, either by index through [`Expression::at`] or through one of the
/// two cursor kinds. A node is itself an [`Expression`], so it can be an
/// operand of another node.
///
/// # Example
///
/// ```rust
/// use strided_lazy::{Expression, Function, StridedArray};
///
/// let a = StridedArray::from_fn_row_major(&[3, 1], |idx| idx[0] as f64);
/// let b = StridedArray::from_fn_row_major(&[1, 4], |idx| idx[1] as f64 * 10.0);
/// let sum = Function::new(|x: f64, y: f64| x + y, (&a, &b));
///
/// assert_eq!(sum.shape(), vec![3, 4]);
/// assert_eq!(sum.at(&[1, 2]), 21.0);
/// ```
#[derive(Clone)]
pub struct Function<F, E> {
    f: F,
    operands: E,
}

impl<F, E: Operands> Function<F, E> {
    /// Build a node applying `f` to `operands`.
    ///
    /// Shapes are not validated here: an incompatible broadcast is reported
    /// by [`Expression::broadcast_shape`] when the node is traversed.
    pub fn new(f: F, operands: E) -> Self {
        log::trace!("building function node over {} operands", E::ARITY);
        Self { f, operands }
    }

    /// The applied function.
    #[inline]
    pub fn function(&self) -> &F {
        &self.f
    }

    /// The operand tuple.
    #[inline]
    pub fn operands(&self) -> &E {
        &self.operands
    }

    /// Split the node back into its function and operands.
    pub fn into_parts(self) -> (F, E) {
        (self.f, self.operands)
    }
}

impl<F, E: Apply<F>> Function<F, E> {
    /// Row-major iterator over the node's own broadcast shape.
    ///
    /// Incompatible operands are not detected here; use
    /// [`traverse`](crate::traverse) for a checked traversal.
    pub fn iter(&self) -> StepperIter<FunctionStepper<'_, F, E>> {
        let shape = self.shape();
        self.iter_broadcast(&shape)
    }

    /// Row-major iterator over a caller-provided broadcast `shape`.
    pub fn iter_broadcast(&self, shape: &[usize]) -> StepperIter<FunctionStepper<'_, F, E>> {
        StepperIter::new(self.stepper_begin(shape), self.stepper_end(shape), shape)
    }

    /// Linear iterator over the operands' storage.
    ///
    /// Only meaningful when [`Expression::is_trivial_broadcast`] holds for
    /// the row-major strides of the node's shape.
    pub fn storage_iter(&self) -> LinearIter<FunctionCursor<'_, F, E>> {
        let len = self.shape().iter().product();
        LinearIter::new(self.storage_begin(), len)
    }
}

impl<F, E: Apply<F>> Expression for Function<F, E> {
    type Value = E::Output;
    type Stepper<'s>
        = FunctionStepper<'s, F, E>
    where
        Self: 's;
    type Cursor<'s>
        = FunctionCursor<'s, F, E>
    where
        Self: 's;

    #[inline]
    fn dimension(&self) -> usize {
        self.operands.dimension()
    }

    #[inline]
    fn at(&self, indices: &[usize]) -> E::Output {
        self.operands.apply_at(&self.f, indices)
    }

    fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
        self.operands.broadcast_shape(shape)
    }

    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
        self.operands.is_trivial_broadcast(strides)
    }

    fn stepper_begin(&self, shape: &[usize]) -> FunctionStepper<'_, F, E> {
        FunctionStepper::new(self, self.operands.steppers_begin(shape))
    }

    fn stepper_end(&self, shape: &[usize]) -> FunctionStepper<'_, F, E> {
        FunctionStepper::new(self, self.operands.steppers_end(shape))
    }

    fn storage_begin(&self) -> FunctionCursor<'_, F, E> {
        FunctionCursor::new(self, self.operands.cursors_begin())
    }

    fn storage_end(&self) -> FunctionCursor<'_, F, E> {
        FunctionCursor::new(self, self.operands.cursors_end())
    }
}

impl<F, E: Operands> std::fmt::Debug for Function<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("arity", &E::ARITY)
            .field("dimension", &self.operands.dimension())
            .finish_non_exhaustive()
    }
}
