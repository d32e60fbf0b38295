//! Per-operand broadcast primitives.
//!
//! Broadcasting aligns shapes on their trailing axes. Missing leading axes
//! behave as extent 1, and an extent of 1 stretches to any other extent:
//!
//! ```text
//!   (3, 1)  with  (1, 4)  -> (3, 4)
//!   ()      with  (5,)    -> (5,)
//!   (2, 3)  with  (4, 3)  -> incompatible
//! ```

/// Memory order of a dense buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Last index varies fastest (C order).
    #[default]
    RowMajor,
    /// First index varies fastest (Fortran/Julia order).
    ColMajor,
}

/// Fold `own` into the caller's `shape` buffer, aligned to trailing axes.
///
/// A buffer extent of 1 takes the operand's extent; equal extents and an
/// operand extent of 1 are compatible. Every axis is visited even after a
/// mismatch. An operand with more axes than the buffer is rejected without
/// touching the buffer.
pub fn broadcast_into_shape(own: &[usize], shape: &mut [usize]) -> bool {
    if own.len() > shape.len() {
        return false;
    }
    let lead = shape.len() - own.len();
    let mut compatible = true;
    for (out, &extent) in shape[lead..].iter_mut().zip(own) {
        if *out == 1 {
            *out = extent;
        } else if extent != 1 && extent != *out {
            compatible = false;
        }
    }
    compatible
}

/// Broadcast two shapes together, returning `None` if they are incompatible.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let mut shape = vec![1; a.len().max(b.len())];
    let ok_a = broadcast_into_shape(a, &mut shape);
    let ok_b = broadcast_into_shape(b, &mut shape);
    (ok_a && ok_b).then_some(shape)
}

/// Dense strides for `dims` in the given layout, with stride 0 on every
/// extent-1 axis.
///
/// These are the strides used to decide whether a broadcast is trivial: an
/// operand with extent 1 on an axis reports stride 0 there, so it only
/// matches a target that has extent 1 on the same axis.
pub fn trivial_strides(dims: &[usize], layout: Layout) -> Vec<isize> {
    let mut strides = vec![0isize; dims.len()];
    let mut acc = 1isize;
    let mut visit = |i: usize| {
        strides[i] = if dims[i] == 1 { 0 } else { acc };
        acc *= dims[i] as isize;
    };
    match layout {
        Layout::RowMajor => (0..dims.len()).rev().for_each(&mut visit),
        Layout::ColMajor => (0..dims.len()).for_each(&mut visit),
    }
    strides
}

/// Compare an operand's `dims`/`strides` against target strides, treating
/// the stride of every extent-1 axis as 0.
pub fn strides_match(dims: &[usize], strides: &[isize], target: &[isize]) -> bool {
    dims.len() == target.len()
        && dims
            .iter()
            .zip(strides)
            .zip(target)
            .all(|((&d, &s), &t)| if d == 1 { t == 0 } else { s == t })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_into_shape_outer() {
        let mut shape = vec![1, 1];
        assert!(broadcast_into_shape(&[3, 1], &mut shape));
        assert!(broadcast_into_shape(&[1, 4], &mut shape));
        assert_eq!(shape, vec![3, 4]);
    }

    #[test]
    fn test_broadcast_into_shape_lower_rank() {
        let mut shape = vec![1, 1, 1];
        assert!(broadcast_into_shape(&[2, 3, 4], &mut shape));
        assert!(broadcast_into_shape(&[4], &mut shape));
        assert!(broadcast_into_shape(&[], &mut shape));
        assert_eq!(shape, vec![2, 3, 4]);
    }

    #[test]
    fn test_broadcast_into_shape_mismatch_visits_all_axes() {
        let mut shape = vec![1, 3];
        // Axis 1 mismatches, axis 0 must still be folded.
        assert!(!broadcast_into_shape(&[5, 4], &mut shape));
        assert_eq!(shape, vec![5, 3]);
    }

    #[test]
    fn test_broadcast_into_shape_too_many_axes() {
        let mut shape = vec![1];
        assert!(!broadcast_into_shape(&[2, 2], &mut shape));
        assert_eq!(shape, vec![1]);
    }

    #[test]
    fn test_broadcast_into_shape_idempotent() {
        let mut shape = vec![1, 1];
        assert!(broadcast_into_shape(&[3, 4], &mut shape));
        let resolved = shape.clone();
        assert!(broadcast_into_shape(&[3, 4], &mut shape));
        assert_eq!(shape, resolved);
    }

    #[test]
    fn test_broadcast_into_shape_zero_extent() {
        let mut shape = vec![1, 1];
        assert!(broadcast_into_shape(&[0, 1], &mut shape));
        assert!(broadcast_into_shape(&[1, 3], &mut shape));
        assert_eq!(shape, vec![0, 3]);
    }

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(broadcast_shapes(&[3, 1], &[1, 4]), Some(vec![3, 4]));
        assert_eq!(broadcast_shapes(&[], &[5]), Some(vec![5]));
        assert_eq!(broadcast_shapes(&[2, 3], &[4, 3]), None);
    }

    #[test]
    fn test_trivial_strides() {
        assert_eq!(trivial_strides(&[2, 3, 4], Layout::RowMajor), vec![12, 4, 1]);
        assert_eq!(trivial_strides(&[2, 3, 4], Layout::ColMajor), vec![1, 2, 6]);
        assert_eq!(trivial_strides(&[3, 1], Layout::RowMajor), vec![1, 0]);
        assert_eq!(trivial_strides(&[1, 4], Layout::RowMajor), vec![0, 1]);
        assert!(trivial_strides(&[], Layout::RowMajor).is_empty());
    }

    #[test]
    fn test_strides_match() {
        assert!(strides_match(&[2, 2], &[2, 1], &[2, 1]));
        // Extent-1 axis compares as stride 0 regardless of stored stride.
        assert!(strides_match(&[1, 4], &[4, 1], &[0, 1]));
        assert!(!strides_match(&[1, 4], &[4, 1], &[4, 1]));
        assert!(!strides_match(&[4], &[1], &[4, 1]));
    }
}
