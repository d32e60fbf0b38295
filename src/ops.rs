//! Ready-made elementwise nodes.
//!
//! Thin constructors over [`Function::new`] for the arithmetic that shows up
//! in most expressions. Operands may be any [`Expression`], including other
//! nodes, and are broadcast against each other.

use std::ops::{Add, Mul, Sub};

use num_traits::MulAdd;
use strided_traits::Expression;

use crate::function::Function;

/// Apply `f` to every element of `a`.
pub fn map<A, F, R>(a: A, f: F) -> Function<F, (A,)>
where
    A: Expression,
    F: Fn(A::Value) -> R,
{
    Function::new(f, (a,))
}

/// Elementwise `a + b`.
pub fn add<A, B>(
    a: A,
    b: B,
) -> Function<impl Fn(A::Value, B::Value) -> <A::Value as Add<B::Value>>::Output + Clone, (A, B)>
where
    A: Expression,
    B: Expression,
    A::Value: Add<B::Value>,
{
    Function::new(|x: A::Value, y: B::Value| x + y, (a, b))
}

/// Elementwise `a - b`.
pub fn sub<A, B>(
    a: A,
    b: B,
) -> Function<impl Fn(A::Value, B::Value) -> <A::Value as Sub<B::Value>>::Output + Clone, (A, B)>
where
    A: Expression,
    B: Expression,
    A::Value: Sub<B::Value>,
{
    Function::new(|x: A::Value, y: B::Value| x - y, (a, b))
}

/// Elementwise `a * b`.
pub fn mul<A, B>(
    a: A,
    b: B,
) -> Function<impl Fn(A::Value, B::Value) -> <A::Value as Mul<B::Value>>::Output + Clone, (A, B)>
where
    A: Expression,
    B: Expression,
    A::Value: Mul<B::Value>,
{
    Function::new(|x: A::Value, y: B::Value| x * y, (a, b))
}

/// Elementwise fused multiply-add `a * b + c`.
pub fn fma<A, B, C>(
    a: A,
    b: B,
    c: C,
) -> Function<
    impl Fn(A::Value, B::Value, C::Value) -> <A::Value as MulAdd<B::Value, C::Value>>::Output + Clone,
    (A, B, C),
>
where
    A: Expression,
    B: Expression,
    C: Expression,
    A::Value: MulAdd<B::Value, C::Value>,
{
    Function::new(
        |x: A::Value, y: B::Value, z: C::Value| x.mul_add(y, z),
        (a, b, c),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strided_view::{Scalar, StridedArray};

    #[test]
    fn test_map() {
        let a = StridedArray::from_fn_row_major(&[2, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
        let sq = map(&a, |x: f64| x * x);
        assert_eq!(sq.iter().collect::<Vec<_>>(), vec![0.0, 1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_add_sub_mul_broadcast() {
        let a = StridedArray::from_fn_row_major(&[3, 1], |idx| idx[0] as i64 + 1);
        let b = StridedArray::from_fn_row_major(&[4], |idx| idx[0] as i64 * 10);
        assert_eq!(add(&a, &b).at(&[2, 3]), 33);
        assert_eq!(sub(&b, &a).at(&[0, 1]), 9);
        assert_eq!(mul(&a, &b).at(&[1, 2]), 40);
        assert_eq!(mul(Scalar(3i64), &a).shape(), vec![3, 1]);
    }

    #[test]
    fn test_fma() {
        let a = StridedArray::from_fn_row_major(&[3], |idx| idx[0] as f64);
        let r = fma(&a, Scalar(2.0), Scalar(0.5));
        let values: Vec<f64> = r.iter().collect();
        assert_relative_eq!(values[0], 0.5);
        assert_relative_eq!(values[2], 4.5);
    }

    #[test]
    fn test_nesting() {
        let a = StridedArray::from_fn_row_major(&[2], |idx| idx[0] as i32 + 1);
        let b = StridedArray::from_fn_row_major(&[2], |idx| idx[0] as i32 + 3);
        let sum = add(&a, &b);
        let scaled = mul(&sum, Scalar(2));
        assert_eq!(scaled.iter().collect::<Vec<_>>(), vec![8, 12]);
    }
}
