//! Lift a scalar function into a factory of [`Function`] nodes.

use crate::function::Function;
use crate::operands::Apply;

/// A scalar function waiting to be applied to operands.
///
/// Each call to [`Vectorizer::apply`] clones the function into a new node,
/// so the vectorizer can be reused for any number of operand tuples.
///
/// # Example
///
/// ```rust
/// use strided_lazy::{vectorize, Expression, Scalar, StridedArray};
///
/// let hypot = vectorize(|x: f64, y: f64| x.hypot(y));
/// let xs = StridedArray::from_fn_row_major(&[3], |idx| idx[0] as f64 * 3.0);
/// let node = hypot.apply((&xs, Scalar(4.0)));
/// assert_eq!(node.at(&[1]), 5.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Vectorizer<F> {
    f: F,
}

/// Wrap `f` so it can be applied elementwise to broadcast operands.
pub fn vectorize<F>(f: F) -> Vectorizer<F> {
    Vectorizer { f }
}

impl<F: Clone> Vectorizer<F> {
    /// Build a node applying a copy of the function to `operands`.
    pub fn apply<E: Apply<F>>(&self, operands: E) -> Function<F, E> {
        Function::new(self.f.clone(), operands)
    }
}

impl<F> Vectorizer<F> {
    /// The wrapped function.
    #[inline]
    pub fn function(&self) -> &F {
        &self.f
    }

    pub fn into_inner(self) -> F {
        self.f
    }
}
