//! 0-dimensional operand.

use strided_traits::{Expression, LinearCursor, Stepper};

/// A single value usable wherever an array operand is expected.
///
/// A scalar has no axes: it is compatible with every broadcast target,
/// always trivially broadcast, and its cursors never move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scalar<T>(pub T);

/// Stepper over a [`Scalar`]. Only [`Stepper::to_end`] changes its state.
#[derive(Debug)]
pub struct ScalarStepper<'a, T> {
    value: &'a T,
    at_end: bool,
}

impl<T> Clone for ScalarStepper<'_, T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value,
            at_end: self.at_end,
        }
    }
}

impl<T> PartialEq for ScalarStepper<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.value, other.value) && self.at_end == other.at_end
    }
}

impl<T: Copy> Stepper for ScalarStepper<'_, T> {
    type Item = T;

    #[inline]
    fn step(&mut self, _dim: usize, _n: usize) {}

    #[inline]
    fn step_back(&mut self, _dim: usize, _n: usize) {}

    #[inline]
    fn reset(&mut self, _dim: usize) {}

    fn to_end(&mut self) {
        self.at_end = true;
    }

    #[inline]
    fn get(&self) -> T {
        *self.value
    }
}

/// Linear cursor over a [`Scalar`].
///
/// Advancing is a no-op, so every cursor over the same scalar compares
/// equal; a composite cursor's end test is decided by its other operands.
#[derive(Debug)]
pub struct ScalarCursor<'a, T> {
    value: &'a T,
}

impl<T> Clone for ScalarCursor<'_, T> {
    fn clone(&self) -> Self {
        Self { value: self.value }
    }
}

impl<T> PartialEq for ScalarCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.value, other.value)
    }
}

impl<T: Copy> LinearCursor for ScalarCursor<'_, T> {
    type Item = T;

    #[inline]
    fn advance(&mut self) {}

    #[inline]
    fn get(&self) -> T {
        *self.value
    }
}

impl<T: Copy> Expression for Scalar<T> {
    type Value = T;
    type Stepper<'s>
        = ScalarStepper<'s, T>
    where
        Self: 's;
    type Cursor<'s>
        = ScalarCursor<'s, T>
    where
        Self: 's;

    #[inline]
    fn dimension(&self) -> usize {
        0
    }

    fn shape(&self) -> Vec<usize> {
        Vec::new()
    }

    #[inline]
    fn at(&self, _indices: &[usize]) -> T {
        self.0
    }

    #[inline]
    fn broadcast_shape(&self, _shape: &mut [usize]) -> bool {
        true
    }

    #[inline]
    fn is_trivial_broadcast(&self, _strides: &[isize]) -> bool {
        true
    }

    fn stepper_begin(&self, _shape: &[usize]) -> ScalarStepper<'_, T> {
        ScalarStepper {
            value: &self.0,
            at_end: false,
        }
    }

    fn stepper_end(&self, _shape: &[usize]) -> ScalarStepper<'_, T> {
        ScalarStepper {
            value: &self.0,
            at_end: true,
        }
    }

    fn storage_begin(&self) -> ScalarCursor<'_, T> {
        ScalarCursor { value: &self.0 }
    }

    fn storage_end(&self) -> ScalarCursor<'_, T> {
        ScalarCursor { value: &self.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strided_traits::StepperIter;

    #[test]
    fn test_scalar_expression() {
        let s = Scalar(2.5f64);
        assert_eq!(s.dimension(), 0);
        assert!(s.shape().is_empty());
        assert_eq!(s.at(&[]), 2.5);
        assert_eq!(s.at(&[3, 1]), 2.5);

        let mut shape = vec![4, 5];
        assert!(s.broadcast_shape(&mut shape));
        assert_eq!(shape, vec![4, 5]);
        assert!(s.is_trivial_broadcast(&[5, 1]));
    }

    #[test]
    fn test_scalar_stepper_never_moves() {
        let s = Scalar(7i32);
        let mut st = s.stepper_begin(&[3, 3]);
        st.step(0, 2);
        st.step(1, 1);
        st.reset(1);
        assert_eq!(st.get(), 7);
        assert!(st != s.stepper_end(&[3, 3]));
        st.to_end();
        assert!(st == s.stepper_end(&[3, 3]));
    }

    #[test]
    fn test_scalar_iterates_once_as_zero_dim() {
        let s = Scalar(1u8);
        let values: Vec<u8> = StepperIter::new(s.stepper_begin(&[]), s.stepper_end(&[]), &[]).collect();
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn test_scalar_cursor_always_equal() {
        let s = Scalar(3i64);
        let mut c = s.storage_begin();
        c.advance();
        assert!(c == s.storage_end());
        assert_eq!(c.get(), 3);
    }
}
