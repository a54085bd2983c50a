//! [`DimVar`]: a magnitude with a dimension vector.
//!
//! The magnitude is stored in base SI units.  Sums, differences, and
//! comparisons require equal dimensions; products and quotients combine
//! them; powers need a dimensionless exponent.  A display unit chosen with
//! [`DimVar::convert_to`] only changes how the value is read back, and any
//! arithmetic result reverts to canonical SI.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use mt_core::{Error, Magnitude, Real, Result};
use mt_uncertainty::Uncertain;

use crate::dimension::Dimension;
use crate::parser::ParsedUnit;
use crate::table::UnitTable;

/// Whether a temperature-like value is a point on its scale or a
/// difference between two points.
///
/// Only affine units care: converting an absolute value applies the unit's
/// offset, converting a relative one does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// A point on the scale (e.g. 20 °C).
    Absolute,
    /// A difference (e.g. a rise of 20 °C).
    Relative,
}

/// A dimension-checked quantity.
#[derive(Debug, Clone)]
pub struct DimVar<M: Magnitude = Real> {
    magnitude: M,
    dimension: Dimension,
    reference: Reference,
    display: Option<ParsedUnit>,
}

impl<M: Magnitude> DimVar<M> {
    /// Absolute quantity in `unit`, parsed with the standard table.
    pub fn new(magnitude: M, unit: &str) -> Result<Self> {
        Self::with_table(magnitude, unit, Reference::Absolute, UnitTable::standard())
    }

    /// Relative quantity (a difference) in `unit`.
    pub fn relative(magnitude: M, unit: &str) -> Result<Self> {
        Self::with_table(magnitude, unit, Reference::Relative, UnitTable::standard())
    }

    /// Quantity in `unit`, parsed with a custom table.
    pub fn with_table(
        magnitude: M,
        unit: &str,
        reference: Reference,
        table: &UnitTable,
    ) -> Result<Self> {
        let parsed = table.parse(unit)?;
        Ok(Self {
            magnitude: to_base(&magnitude, &parsed, reference),
            dimension: parsed.dimension(),
            reference,
            display: None,
        })
    }

    /// Dimensionless quantity; bare numbers are coerced through this.
    pub fn dimensionless(magnitude: M) -> Self {
        Self::from_base(magnitude, Dimension::DIMENSIONLESS)
    }

    /// Quantity whose magnitude is already in base SI.
    pub fn from_base(magnitude: M, dimension: Dimension) -> Self {
        Self {
            magnitude,
            dimension,
            reference: Reference::Absolute,
            display: None,
        }
    }

    /// Magnitude in base SI.
    pub fn base_magnitude(&self) -> &M {
        &self.magnitude
    }

    /// Magnitude in the display unit (base SI unless converted).
    pub fn magnitude(&self) -> M {
        match &self.display {
            Some(unit) => from_base(&self.magnitude, unit, self.reference),
            None => self.magnitude.clone(),
        }
    }

    /// Display unit: the string given to `convert_to`, else canonical SI.
    pub fn unit(&self) -> String {
        match &self.display {
            Some(unit) => unit.text().to_string(),
            None => self.dimension.format_unit(),
        }
    }

    /// Exponent vector.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Absolute or relative.
    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// `true` if every exponent is zero.
    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// The same quantity expressed in `unit`.
    pub fn convert_to(&self, unit: &str) -> Result<Self> {
        self.convert_with_table(unit, UnitTable::standard())
    }

    /// [`convert_to`](Self::convert_to) with a custom table.
    pub fn convert_with_table(&self, unit: &str, table: &UnitTable) -> Result<Self> {
        let parsed = table.parse(unit)?;
        if parsed.dimension() != self.dimension {
            return Err(Error::UnitMismatch {
                left: self.dimension.format_unit(),
                right: parsed.dimension().format_unit(),
                op: "convert".to_string(),
            });
        }
        Ok(Self {
            display: Some(parsed),
            ..self.clone()
        })
    }

    /// Magnitude expressed in `unit`.
    pub fn value_in(&self, unit: &str) -> Result<M> {
        Ok(self.convert_to(unit)?.magnitude())
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    fn require_same_dimension(&self, rhs: &Self, op: &str) -> Result<()> {
        if self.dimension != rhs.dimension {
            return Err(Error::UnitMismatch {
                left: self.dimension.format_unit(),
                right: rhs.dimension.format_unit(),
                op: op.to_string(),
            });
        }
        Ok(())
    }

    /// `self + rhs`; dimensions must match.
    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.require_same_dimension(rhs, "add")?;
        let reference = match (self.reference, rhs.reference) {
            (Reference::Relative, Reference::Relative) => Reference::Relative,
            _ => Reference::Absolute,
        };
        Ok(self.derived(self.magnitude.try_add(&rhs.magnitude)?, self.dimension, reference))
    }

    /// `self - rhs`; dimensions must match.  The difference of two absolute
    /// values is relative.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.require_same_dimension(rhs, "subtract")?;
        let reference = match (self.reference, rhs.reference) {
            (Reference::Absolute, Reference::Absolute) => Reference::Relative,
            (Reference::Relative, Reference::Relative) => Reference::Relative,
            _ => Reference::Absolute,
        };
        Ok(self.derived(self.magnitude.try_sub(&rhs.magnitude)?, self.dimension, reference))
    }

    /// `self * rhs`; exponent vectors add.
    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        Ok(self.derived(
            self.magnitude.try_mul(&rhs.magnitude)?,
            self.dimension * rhs.dimension,
            Reference::Relative,
        ))
    }

    /// `self / rhs`; exponent vectors subtract.
    pub fn try_div(&self, rhs: &Self) -> Result<Self> {
        Ok(self.derived(
            self.magnitude.try_div(&rhs.magnitude)?,
            self.dimension / rhs.dimension,
            Reference::Relative,
        ))
    }

    /// `self ^ exponent`; the exponent must be dimensionless and the vector
    /// is scaled by its value.
    pub fn try_pow(&self, exponent: &Self) -> Result<Self> {
        if !exponent.is_dimensionless() {
            return Err(Error::NonDimensionlessExponent(exponent.dimension.format_unit()));
        }
        let power = exponent.magnitude.exponent_value()?;
        Ok(self.derived(
            self.magnitude.try_pow(&exponent.magnitude)?,
            self.dimension.powf(power),
            Reference::Relative,
        ))
    }

    /// `self ^ power` for a plain number.
    pub fn powf(&self, power: Real) -> Result<Self> {
        self.try_pow(&Self::dimensionless(M::from_real(power)))
    }

    /// Square root; the exponent vector is halved.
    pub fn sqrt(&self) -> Self {
        self.derived(
            self.magnitude.sqrt(),
            self.dimension.powf(0.5),
            Reference::Relative,
        )
    }

    fn derived(&self, magnitude: M, dimension: Dimension, reference: Reference) -> Self {
        Self {
            magnitude,
            dimension,
            reference,
            display: None,
        }
    }
}

impl<M: Magnitude + PartialOrd> DimVar<M> {
    /// Compare magnitudes; dimensions must match.
    pub fn try_cmp(&self, rhs: &Self) -> Result<Option<Ordering>> {
        self.require_same_dimension(rhs, "compare")?;
        Ok(self.magnitude.partial_cmp(&rhs.magnitude))
    }

    /// `self < rhs`.
    pub fn less_than(&self, rhs: &Self) -> Result<bool> {
        Ok(self.try_cmp(rhs)? == Some(Ordering::Less))
    }

    /// `self > rhs`.
    pub fn greater_than(&self, rhs: &Self) -> Result<bool> {
        Ok(self.try_cmp(rhs)? == Some(Ordering::Greater))
    }

    /// `self == rhs`, magnitude only.
    pub fn equals(&self, rhs: &Self) -> Result<bool> {
        Ok(self.try_cmp(rhs)? == Some(Ordering::Equal))
    }
}

impl DimVar<Uncertain> {
    /// Absolute quantity whose magnitude is a named uncertainty leaf.
    pub fn uncertain(
        value: Real,
        uncertainty: Real,
        name: impl Into<String>,
        unit: &str,
    ) -> Result<Self> {
        Self::new(Uncertain::named(value, uncertainty, name), unit)
    }
}

fn to_base<M: Magnitude>(magnitude: &M, unit: &ParsedUnit, reference: Reference) -> M {
    let scaled = magnitude.scale(unit.scale());
    match (unit.offset(), reference) {
        (Some(offset), Reference::Absolute) => scaled.shift(offset),
        _ => scaled,
    }
}

fn from_base<M: Magnitude>(magnitude: &M, unit: &ParsedUnit, reference: Reference) -> M {
    let shifted = match (unit.offset(), reference) {
        (Some(offset), Reference::Absolute) => magnitude.shift(-offset),
        _ => magnitude.clone(),
    };
    shifted.scale(1.0 / unit.scale())
}

// ── Operators ─────────────────────────────────────────────────────────────────

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl<M: Magnitude> $trait<&DimVar<M>> for &DimVar<M> {
            type Output = Result<DimVar<M>>;
            fn $method(self, rhs: &DimVar<M>) -> Result<DimVar<M>> {
                self.$inner(rhs)
            }
        }

        impl<M: Magnitude> $trait<Real> for &DimVar<M> {
            type Output = Result<DimVar<M>>;
            fn $method(self, rhs: Real) -> Result<DimVar<M>> {
                self.$inner(&DimVar::dimensionless(M::from_real(rhs)))
            }
        }

        impl<M: Magnitude> $trait<&DimVar<M>> for Real {
            type Output = Result<DimVar<M>>;
            fn $method(self, rhs: &DimVar<M>) -> Result<DimVar<M>> {
                DimVar::dimensionless(M::from_real(self)).$inner(rhs)
            }
        }
    };
}

binary_operator!(Add, add, try_add);
binary_operator!(Sub, sub, try_sub);
binary_operator!(Mul, mul, try_mul);
binary_operator!(Div, div, try_div);

impl<M: Magnitude> Neg for &DimVar<M> {
    type Output = DimVar<M>;
    fn neg(self) -> DimVar<M> {
        DimVar {
            magnitude: self.magnitude.negate(),
            ..self.clone()
        }
    }
}

impl<M: Magnitude> fmt::Display for DimVar<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.magnitude(), self.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn stored_in_base_units() {
        let p = DimVar::new(1.0, "atm").unwrap();
        assert_eq!(*p.base_magnitude(), 101_325.0);
        assert_eq!(p.unit(), "kg/m-s^2");
    }

    #[test]
    fn conversion_changes_display_only() {
        let p = DimVar::new(2.0, "bar").unwrap().convert_to("kPa").unwrap();
        assert_abs_diff_eq!(p.magnitude(), 200.0, epsilon = 1e-9);
        assert_eq!(p.unit(), "kPa");
        let doubled = (&p * 2.0).unwrap();
        assert_eq!(doubled.unit(), "kg/m-s^2");
        assert_abs_diff_eq!(doubled.magnitude(), 400_000.0, epsilon = 1e-6);
    }

    #[test]
    fn relative_temperatures_skip_offset() {
        let rise = DimVar::relative(10.0, "C").unwrap();
        assert_abs_diff_eq!(*rise.base_magnitude(), 10.0);
        assert_abs_diff_eq!(rise.value_in("F").unwrap(), 18.0, epsilon = 1e-9);

        let point = DimVar::new(10.0, "C").unwrap();
        assert_abs_diff_eq!(point.value_in("F").unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn absolute_plus_relative_is_absolute() {
        let t = DimVar::new(20.0, "C").unwrap();
        let dt = DimVar::relative(5.0, "C").unwrap();
        let sum = (&t + &dt).unwrap();
        assert_eq!(sum.reference(), Reference::Absolute);
        assert_abs_diff_eq!(sum.value_in("C").unwrap(), 25.0, epsilon = 1e-9);
        let diff = (&t - &t).unwrap();
        assert_eq!(diff.reference(), Reference::Relative);
    }

    #[test]
    fn negation_keeps_unit() {
        let x = DimVar::new(3.0, "ft").unwrap();
        let n = -&x;
        assert_abs_diff_eq!(*n.base_magnitude(), -0.9144, epsilon = 1e-12);
        assert_eq!(n.dimension(), x.dimension());
    }

    #[test]
    fn sqrt_halves_exponents() {
        let area = DimVar::new(4.0, "m^2").unwrap();
        let side = area.sqrt();
        assert_abs_diff_eq!(*side.base_magnitude(), 2.0);
        assert_eq!(side.unit(), "m");
    }

    #[test]
    fn literal_is_dimensionless() {
        let x = DimVar::new(3.0, "m").unwrap();
        assert!(matches!(&x + 1.0, Err(Error::UnitMismatch { .. })));
        let r = (1.0 / &x).unwrap();
        assert_eq!(r.unit(), "1/m");
        let ratio = (&x / &x).unwrap();
        assert!((&ratio + 1.0).is_ok());
    }

    #[test]
    fn comparisons_require_matching_units() {
        let a = DimVar::new(1.0, "ft").unwrap();
        let b = DimVar::new(1.0, "m").unwrap();
        assert!(a.less_than(&b).unwrap());
        assert!(b.greater_than(&a).unwrap());
        assert!(a.equals(&a.convert_to("in").unwrap()).unwrap());
        let s = DimVar::new(1.0, "s").unwrap();
        assert!(matches!(a.less_than(&s), Err(Error::UnitMismatch { .. })));
    }

    #[test]
    fn display_in_brackets() {
        let x = DimVar::new(2.5, "m").unwrap();
        assert_eq!(x.to_string(), "2.5 [m]");
    }
}
