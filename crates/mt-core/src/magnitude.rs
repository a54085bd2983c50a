//! The [`Magnitude`] trait: the numeric interface a dimensioned quantity
//! needs from whatever it carries.
//!
//! A dimensioned value stores its magnitude in base SI units and only ever
//! touches it through this trait, so the same unit machinery works over
//! plain `f64`, a scalar uncertainty value, or an array of them.  Binary
//! operations are fallible because array-shaped magnitudes can fail to
//! broadcast.

use std::fmt;

use crate::errors::Result;
use crate::Real;

/// Arithmetic required of a quantity's magnitude.
pub trait Magnitude: Clone + fmt::Debug + fmt::Display + Sized {
    /// Wrap a bare literal (zero uncertainty, no provenance).
    fn from_real(x: Real) -> Self;

    /// `self + rhs`.
    fn try_add(&self, rhs: &Self) -> Result<Self>;

    /// `self - rhs`.
    fn try_sub(&self, rhs: &Self) -> Result<Self>;

    /// `self * rhs`.
    fn try_mul(&self, rhs: &Self) -> Result<Self>;

    /// `self / rhs`.
    fn try_div(&self, rhs: &Self) -> Result<Self>;

    /// `self ^ rhs`.
    fn try_pow(&self, rhs: &Self) -> Result<Self>;

    /// `-self`.
    fn negate(&self) -> Self;

    /// Multiply by an exact constant.  Used for unit conversion, so it must
    /// not be treated as combining with an independent operand.
    fn scale(&self, factor: Real) -> Self;

    /// Add an exact constant (affine unit offsets).
    fn shift(&self, offset: Real) -> Self;

    /// Square root.
    fn sqrt(&self) -> Self;

    /// The single real number this magnitude stands for when it is used as
    /// an exponent.  Array magnitudes that are not scalar fail.
    fn exponent_value(&self) -> Result<Real>;
}

impl Magnitude for Real {
    fn from_real(x: Real) -> Self {
        x
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        Ok(self + rhs)
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        Ok(self - rhs)
    }

    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        Ok(self * rhs)
    }

    fn try_div(&self, rhs: &Self) -> Result<Self> {
        Ok(self / rhs)
    }

    fn try_pow(&self, rhs: &Self) -> Result<Self> {
        Ok(self.powf(*rhs))
    }

    fn negate(&self) -> Self {
        -self
    }

    fn scale(&self, factor: Real) -> Self {
        self * factor
    }

    fn shift(&self, offset: Real) -> Self {
        self + offset
    }

    fn sqrt(&self) -> Self {
        Real::sqrt(*self)
    }

    fn exponent_value(&self) -> Result<Real> {
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn affine<M: Magnitude>(m: &M) -> M {
        m.scale(5.0 / 9.0).shift(255.372)
    }

    #[test]
    fn real_magnitude_arithmetic() {
        let a = 3.0_f64;
        let b = 2.0_f64;
        assert_eq!(a.try_add(&b), Ok(5.0));
        assert_eq!(a.try_sub(&b), Ok(1.0));
        assert_eq!(a.try_mul(&b), Ok(6.0));
        assert_eq!(a.try_div(&b), Ok(1.5));
        assert_eq!(a.try_pow(&b), Ok(9.0));
        assert_eq!(a.negate(), -3.0);
    }

    #[test]
    fn generic_affine_helper() {
        assert_abs_diff_eq!(affine(&0.0_f64), 255.372, epsilon = 1e-12);
        assert_abs_diff_eq!(Magnitude::sqrt(&16.0_f64), 4.0);
    }
}
