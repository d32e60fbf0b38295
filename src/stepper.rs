//! Cursors over a [`Function`] node.
//!
//! Both cursor kinds hold a reference to the node (for its function) and one
//! cursor per operand. Every movement is forwarded to all operand cursors in
//! lockstep; dereferencing applies the function to the operand values.
//! Two cursors are equal when they belong to the same node and every operand
//! cursor is equal.

use strided_traits::{LinearCursor, Stepper};

use crate::function::Function;
use crate::operands::{Apply, Operands};

/// N-dimensional stepper over a [`Function`] node.
pub struct FunctionStepper<'s, F, E>
where
    E: Operands + 's,
{
    node: &'s Function<F, E>,
    steppers: E::Steppers<'s>,
}

impl<'s, F, E: Operands + 's> FunctionStepper<'s, F, E> {
    pub(crate) fn new(node: &'s Function<F, E>, steppers: E::Steppers<'s>) -> Self {
        Self { node, steppers }
    }

    /// Node this stepper belongs to.
    #[inline]
    pub fn node(&self) -> &'s Function<F, E> {
        self.node
    }
}

impl<'s, F, E: Operands + 's> Clone for FunctionStepper<'s, F, E> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            steppers: self.steppers.clone(),
        }
    }
}

impl<'s, F, E: Operands + 's> PartialEq for FunctionStepper<'s, F, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node) && self.steppers == other.steppers
    }
}

impl<'s, F, E: Apply<F> + 's> Stepper for FunctionStepper<'s, F, E> {
    type Item = E::Output;

    #[inline]
    fn step(&mut self, dim: usize, n: usize) {
        E::step(&mut self.steppers, dim, n);
    }

    #[inline]
    fn step_back(&mut self, dim: usize, n: usize) {
        E::step_back(&mut self.steppers, dim, n);
    }

    #[inline]
    fn reset(&mut self, dim: usize) {
        E::reset(&mut self.steppers, dim);
    }

    fn to_end(&mut self) {
        E::to_end(&mut self.steppers);
    }

    #[inline]
    fn get(&self) -> E::Output {
        E::apply_steppers(self.node.function(), &self.steppers)
    }
}

/// Linear storage cursor over a [`Function`] node.
pub struct FunctionCursor<'s, F, E>
where
    E: Operands + 's,
{
    node: &'s Function<F, E>,
    cursors: E::Cursors<'s>,
}

impl<'s, F, E: Operands + 's> FunctionCursor<'s, F, E> {
    pub(crate) fn new(node: &'s Function<F, E>, cursors: E::Cursors<'s>) -> Self {
        Self { node, cursors }
    }

    /// Node this cursor belongs to.
    #[inline]
    pub fn node(&self) -> &'s Function<F, E> {
        self.node
    }
}

impl<'s, F, E: Operands + 's> Clone for FunctionCursor<'s, F, E> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            cursors: self.cursors.clone(),
        }
    }
}

impl<'s, F, E: Operands + 's> PartialEq for FunctionCursor<'s, F, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node) && self.cursors == other.cursors
    }
}

impl<'s, F, E: Apply<F> + 's> LinearCursor for FunctionCursor<'s, F, E> {
    type Item = E::Output;

    #[inline]
    fn advance(&mut self) {
        E::advance(&mut self.cursors);
    }

    #[inline]
    fn get(&self) -> E::Output {
        E::apply_cursors(self.node.function(), &self.cursors)
    }
}
