//! Floating-point comparison utilities.

use crate::Real;

/// Default epsilon for close-enough comparisons.
pub const EPSILON: Real = 1e-10;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Element-wise [`close`] over two slices of equal length.
pub fn close_slices(a: &[Real], b: &[Real], epsilon: Real) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| close(*x, *y, epsilon))
}
