//! Fixed-arity operand tuples.
//!
//! A [`Function`](crate::Function) holds its operands as a tuple of 1 to 6
//! [`Expression`]s. [`Operands`] folds shape and layout queries over the
//! tuple and fans cursor movements out to every member; [`Apply`] feeds the
//! members' values to the function in declaration order.
//!
//! Shape folding visits every operand even after one reports an
//! incompatibility: each operand must see (and update) the shared buffer.
//! The triviality check has no side effects and stops at the first `false`.

use strided_traits::{Expression, LinearCursor, Stepper};

use crate::access::trim;

/// Shape, layout and cursor fan-out over a tuple of operands.
pub trait Operands {
    /// One stepper per operand.
    type Steppers<'s>: Clone + PartialEq
    where
        Self: 's;

    /// One linear cursor per operand.
    type Cursors<'s>: Clone + PartialEq
    where
        Self: 's;

    /// Number of operands.
    const ARITY: usize;

    /// Largest operand dimension.
    fn dimension(&self) -> usize;

    /// Fold every operand's shape into `shape`, left to right, and AND the results.
    fn broadcast_shape(&self, shape: &mut [usize]) -> bool;

    /// Whether every operand is laid out exactly as `strides`.
    fn is_trivial_broadcast(&self, strides: &[isize]) -> bool;

    /// Every operand's stepper at the origin of `shape`.
    fn steppers_begin(&self, shape: &[usize]) -> Self::Steppers<'_>;

    /// Every operand's stepper at the past-the-end position of `shape`.
    fn steppers_end(&self, shape: &[usize]) -> Self::Steppers<'_>;

    /// Every operand's linear cursor at its first stored element.
    fn cursors_begin(&self) -> Self::Cursors<'_>;

    /// Every operand's linear cursor past its last stored element.
    fn cursors_end(&self) -> Self::Cursors<'_>;

    /// Advance every stepper `n` positions along target axis `dim`.
    fn step<'s>(steppers: &mut Self::Steppers<'s>, dim: usize, n: usize)
    where
        Self: 's;

    /// Move every stepper back `n` positions along target axis `dim`.
    fn step_back<'s>(steppers: &mut Self::Steppers<'s>, dim: usize, n: usize)
    where
        Self: 's;

    /// Return every stepper to the start of target axis `dim`.
    fn reset<'s>(steppers: &mut Self::Steppers<'s>, dim: usize)
    where
        Self: 's;

    /// Move every stepper to its past-the-end position.
    fn to_end<'s>(steppers: &mut Self::Steppers<'s>)
    where
        Self: 's;

    /// Advance every linear cursor by one element.
    fn advance<'s>(cursors: &mut Self::Cursors<'s>)
    where
        Self: 's;
}

/// Application of a function `F` to one value from each operand.
pub trait Apply<F>: Operands {
    /// Return type of `F`, and therefore the element type of the composite.
    type Output;

    /// `f(op_0.at(trim(indices)), ..., op_n.at(trim(indices)))`.
    fn apply_at(&self, f: &F, indices: &[usize]) -> Self::Output;

    /// `f` applied to the values under each stepper.
    fn apply_steppers<'s>(f: &F, steppers: &Self::Steppers<'s>) -> Self::Output
    where
        Self: 's;

    /// `f` applied to the values under each linear cursor.
    fn apply_cursors<'s>(f: &F, cursors: &Self::Cursors<'s>) -> Self::Output
    where
        Self: 's;
}

macro_rules! impl_operands {
    ($arity:expr; $(($E:ident, $idx:tt)),+) => {
        impl<$($E: Expression),+> Operands for ($($E,)+) {
            type Steppers<'s> = ($($E::Stepper<'s>,)+) where Self: 's;
            type Cursors<'s> = ($($E::Cursor<'s>,)+) where Self: 's;

            const ARITY: usize = $arity;

            #[inline]
            fn dimension(&self) -> usize {
                let mut dim = 0;
                $(dim = dim.max(self.$idx.dimension());)+
                dim
            }

            fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
                let mut compatible = true;
                $(compatible &= self.$idx.broadcast_shape(shape);)+
                compatible
            }

            fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
                true $(&& self.$idx.is_trivial_broadcast(strides))+
            }

            fn steppers_begin(&self, shape: &[usize]) -> Self::Steppers<'_> {
                ($(self.$idx.stepper_begin(shape),)+)
            }

            fn steppers_end(&self, shape: &[usize]) -> Self::Steppers<'_> {
                ($(self.$idx.stepper_end(shape),)+)
            }

            fn cursors_begin(&self) -> Self::Cursors<'_> {
                ($(self.$idx.storage_begin(),)+)
            }

            fn cursors_end(&self) -> Self::Cursors<'_> {
                ($(self.$idx.storage_end(),)+)
            }

            #[inline]
            fn step<'s>(steppers: &mut Self::Steppers<'s>, dim: usize, n: usize)
            where
                Self: 's,
            {
                $(steppers.$idx.step(dim, n);)+
            }

            #[inline]
            fn step_back<'s>(steppers: &mut Self::Steppers<'s>, dim: usize, n: usize)
            where
                Self: 's,
            {
                $(steppers.$idx.step_back(dim, n);)+
            }

            #[inline]
            fn reset<'s>(steppers: &mut Self::Steppers<'s>, dim: usize)
            where
                Self: 's,
            {
                $(steppers.$idx.reset(dim);)+
            }

            fn to_end<'s>(steppers: &mut Self::Steppers<'s>)
            where
                Self: 's,
            {
                $(steppers.$idx.to_end();)+
            }

            #[inline]
            fn advance<'s>(cursors: &mut Self::Cursors<'s>)
            where
                Self: 's,
            {
                $(cursors.$idx.advance();)+
            }
        }

        impl<Func, R, $($E: Expression),+> Apply<Func> for ($($E,)+)
        where
            Func: Fn($($E::Value),+) -> R,
        {
            type Output = R;

            #[inline]
            fn apply_at(&self, f: &Func, indices: &[usize]) -> R {
                f($(self.$idx.at(trim(indices, self.$idx.dimension()))),+)
            }

            #[inline]
            fn apply_steppers<'s>(f: &Func, steppers: &Self::Steppers<'s>) -> R
            where
                Self: 's,
            {
                f($(steppers.$idx.get()),+)
            }

            #[inline]
            fn apply_cursors<'s>(f: &Func, cursors: &Self::Cursors<'s>) -> R
            where
                Self: 's,
            {
                f($(cursors.$idx.get()),+)
            }
        }
    };
}

impl_operands!(1; (E0, 0));
impl_operands!(2; (E0, 0), (E1, 1));
impl_operands!(3; (E0, 0), (E1, 1), (E2, 2));
impl_operands!(4; (E0, 0), (E1, 1), (E2, 2), (E3, 3));
impl_operands!(5; (E0, 0), (E1, 1), (E2, 2), (E3, 3), (E4, 4));
impl_operands!(6; (E0, 0), (E1, 1), (E2, 2), (E3, 3), (E4, 4), (E5, 5));

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use strided_view::{Scalar, StridedArray};

    /// Operand that records whether its shape was folded.
    struct Probe<'a> {
        inner: StridedArray<i32>,
        folded: &'a Cell<bool>,
    }

    impl Expression for Probe<'_> {
        type Value = i32;
        type Stepper<'s>
            = <StridedArray<i32> as Expression>::Stepper<'s>
        where
            Self: 's;
        type Cursor<'s>
            = <StridedArray<i32> as Expression>::Cursor<'s>
        where
            Self: 's;

        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        fn at(&self, indices: &[usize]) -> i32 {
            self.inner.at(indices)
        }

        fn broadcast_shape(&self, shape: &mut [usize]) -> bool {
            self.folded.set(true);
            self.inner.broadcast_shape(shape)
        }

        fn is_trivial_broadcast(&self, strides: &[isize]) -> bool {
            self.inner.is_trivial_broadcast(strides)
        }

        fn stepper_begin(&self, shape: &[usize]) -> Self::Stepper<'_> {
            self.inner.stepper_begin(shape)
        }

        fn stepper_end(&self, shape: &[usize]) -> Self::Stepper<'_> {
            self.inner.stepper_end(shape)
        }

        fn storage_begin(&self) -> Self::Cursor<'_> {
            self.inner.storage_begin()
        }

        fn storage_end(&self) -> Self::Cursor<'_> {
            self.inner.storage_end()
        }
    }

    #[test]
    fn test_dimension_is_max() {
        let ops = (
            StridedArray::<i32>::row_major(&[4]),
            Scalar(1i32),
            StridedArray::<i32>::row_major(&[2, 1, 4]),
        );
        assert_eq!(ops.dimension(), 3);
        assert_eq!(<(StridedArray<i32>, Scalar<i32>, StridedArray<i32>)>::ARITY, 3);
    }

    #[test]
    fn test_broadcast_shape_does_not_short_circuit() {
        let folded = Cell::new(false);
        let ops = (
            StridedArray::<i32>::row_major(&[3]),
            StridedArray::<i32>::row_major(&[4]),
            Probe {
                inner: StridedArray::row_major(&[2, 1]),
                folded: &folded,
            },
        );
        let mut shape = vec![1, 1];
        assert!(!ops.broadcast_shape(&mut shape));
        assert!(folded.get());
        // The last operand still folded its leading axis.
        assert_eq!(shape[0], 2);
    }

    #[test]
    fn test_apply_at_trims_per_operand() {
        let a = StridedArray::from_fn_row_major(&[3, 1], |idx| idx[0] as i32 * 10);
        let b = StridedArray::from_fn_row_major(&[4], |idx| idx[0] as i32);
        let ops = (&a, &b);
        let add = |x: i32, y: i32| x + y;
        // b sees only the trailing index.
        assert_eq!(ops.apply_at(&add, &[2, 0]), 20);
        let c = StridedArray::from_fn_row_major(&[3, 4], |idx| (idx[0] * 4 + idx[1]) as i32);
        let ops = (&c, &b);
        assert_eq!(ops.apply_at(&add, &[2, 3]), 11 + 3);
    }

    #[test]
    fn test_apply_preserves_argument_order() {
        let ops = (Scalar(10i32), Scalar(3i32));
        let sub = |x: i32, y: i32| x - y;
        assert_eq!(ops.apply_at(&sub, &[]), 7);
    }

    #[test]
    fn test_steppers_move_together() {
        let a = StridedArray::from_fn_row_major(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as i32);
        let b = StridedArray::from_fn_row_major(&[3], |idx| idx[0] as i32 * 100);
        let ops = (&a, &b);
        let shape = [2, 3];
        let mut steppers = ops.steppers_begin(&shape);
        <(&StridedArray<i32>, &StridedArray<i32>)>::step(&mut steppers, 1, 2);
        <(&StridedArray<i32>, &StridedArray<i32>)>::step(&mut steppers, 0, 1);
        let pair = |x: i32, y: i32| (x, y);
        assert_eq!(
            <(&StridedArray<i32>, &StridedArray<i32>) as Apply<_>>::apply_steppers(&pair, &steppers),
            (5, 200)
        );
    }
}
