//! Operand ownership modes.
//!
//! A node's operand tuple stores whatever it is given, so the usual way to
//! pick an ownership mode is just the operand type: `A` (owned), `&A`
//! (borrowed) or `Arc<A>` (shared). [`Closure`] bundles the three into one
//! type when the mode is only known at run time, e.g. when building a vector
//! of nodes from mixed sources.

use std::sync::Arc;

use strided_traits::Expression;

/// How a [`Closure`] holds its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureKind {
    Owned,
    Borrowed,
    Shared,
}

/// An expression held by value, by reference or through an [`Arc`].
#[derive(Debug)]
pub enum Closure<'a, E> {
    Owned(E),
    Borrowed(&'a E),
    Shared(Arc<E>),
}

impl<'a, E> Closure<'a, E> {
    #[inline]
    pub fn kind(&self) -> ClosureKind {
        match self {
            Closure::Owned(_) => ClosureKind::Owned,
            Closure::Borrowed(_) => ClosureKind::Borrowed,
            Closure::Shared(_) => ClosureKind::Shared,
        }
    }

    /// The held expression.
    #[inline]
    pub fn get(&self) -> &E {
        match self {
            Closure::Owned(e) => e,
            Closure::Borrowed(e) => e,
            Closure::Shared(e) => e,
        }
    }
}

impl<E: Clone> Clone for Closure<'_, E> {
    fn clone(&self) -> Self {
        match self {
            Closure::Owned(e) => Closure::Owned(e.clone()),
            Closure::Borrowed(e) => Closure::Borrowed(*e),
            Closure::Shared(e) => Closure::Shared(Arc::clone(e)),
        }
    }
}

impl<E> From<E> for Closure<'_, E> {
    fn from(e: E) -> Self {
        Closure::Owned(e)
    }
}

impl<'a, E> From<&'a E> for Closure<'a, E> {
    fn from(e: &'a E) -> Self {
        Closure::Borrowed(e)
    }
}

impl<E> From<Arc<E>> for Closure<'_, E> {
    fn from(e: Arc<E>) -> Self {
        Closure::Shared(e)
    }
}

impl<E: Expression> Expression for Closure<'_, E> {
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
        self.get().dimension()
    }

    fn shape(&self) -> Vec<usize> {
        self.get().shape()
    }

    #[inline]
    fn at(&self, indices: &[usize]) -> E::Value {
        self.get().at(indices)
    }

    fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
        self.get().broadcast_shape(shape)
    }

    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
        self.get().is_trivial_broadcast(strides)
    }

    fn stepper_begin(&self, shape: &[usize]) -> E::Stepper<'_> {
        self.get().stepper_begin(shape)
    }

    fn stepper_end(&self, shape: &[usize]) -> E::Stepper<'_> {
        self.get().stepper_end(shape)
    }

    fn storage_begin(&self) -> E::Cursor<'_> {
        self.get().storage_begin()
    }

    fn storage_end(&self) -> E::Cursor<'_> {
        self.get().storage_end()
    }
}
