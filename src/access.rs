//! Trailing-axis index alignment.
//!
//! A composite is indexed with one index per axis of its broadcast shape.
//! Each operand sees only the trailing indices that match its own rank, so a
//! lower-rank operand behaves as if it had leading axes of extent 1.
//!
//! ```text
//! indices  (i0, i1, i2)
//! rank 3 -> (i0, i1, i2)
//! rank 1 ->         (i2)
//! rank 0 ->          ()
//! ```

/// Trailing `dim` entries of `indices`.
///
/// Supplying fewer than `dim` indices is a caller error; the slice is then
/// returned whole and the operand decides what happens.
#[inline]
pub fn trim(indices: &[usize], dim: usize) -> &[usize] {
    &indices[indices.len().saturating_sub(dim)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_drops_leading() {
        assert_eq!(trim(&[4, 5, 6], 3), &[4, 5, 6]);
        assert_eq!(trim(&[4, 5, 6], 2), &[5, 6]);
        assert_eq!(trim(&[4, 5, 6], 1), &[6]);
    }

    #[test]
    fn test_trim_zero_dim() {
        assert!(trim(&[4, 5, 6], 0).is_empty());
        assert!(trim(&[], 0).is_empty());
    }
}
