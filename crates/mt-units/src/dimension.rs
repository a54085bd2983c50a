//! Base-dimension exponent vectors.

use std::fmt;
use std::ops::{Div, Mul};

use mt_core::{close, close_slices, Real};

/// Tolerance used when comparing exponents.
const EXPONENT_EPSILON: Real = 1e-9;

/// The five base dimensions, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    /// Mass (kg).
    Mass,
    /// Length (m).
    Length,
    /// Time (s).
    Time,
    /// Temperature (K).
    Temperature,
    /// Amount of substance (mol).
    Amount,
}

impl BaseDimension {
    /// All base dimensions in vector order.
    pub const ALL: [BaseDimension; 5] = [
        BaseDimension::Mass,
        BaseDimension::Length,
        BaseDimension::Time,
        BaseDimension::Temperature,
        BaseDimension::Amount,
    ];

    /// SI symbol of the base unit.
    pub fn symbol(self) -> &'static str {
        match self {
            BaseDimension::Mass => "kg",
            BaseDimension::Length => "m",
            BaseDimension::Time => "s",
            BaseDimension::Temperature => "K",
            BaseDimension::Amount => "mol",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Exponents over `[mass, length, time, temperature, amount]`.
///
/// Equality tolerates rounding in the exponents (`1e-9`), since fractional
/// powers are carried as floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dimension([Real; 5]);

impl Dimension {
    /// The dimensionless vector.
    pub const DIMENSIONLESS: Dimension = Dimension([0.0; 5]);

    /// Build from raw exponents.
    pub const fn new(exponents: [Real; 5]) -> Self {
        Self(exponents)
    }

    /// Unit vector along one base dimension.
    pub fn base(dimension: BaseDimension) -> Self {
        let mut e = [0.0; 5];
        e[dimension.index()] = 1.0;
        Self(e)
    }

    /// Raw exponents.
    pub fn exponents(&self) -> [Real; 5] {
        self.0
    }

    /// Exponent of one base dimension.
    pub fn exponent(&self, dimension: BaseDimension) -> Real {
        self.0[dimension.index()]
    }

    /// `true` if every exponent is zero.
    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }

    /// Every exponent multiplied by `power`.
    pub fn powf(&self, power: Real) -> Self {
        Self(self.0.map(|e| e * power))
    }

    /// Canonical unit string, e.g. `kg-m/s^2`, `1/s`, or `-` when
    /// dimensionless.
    pub fn format_unit(&self) -> String {
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for base in BaseDimension::ALL {
            let e = self.exponent(base);
            if e.abs() < EXPONENT_EPSILON {
                continue;
            }
            let target = if e > 0.0 {
                &mut numerator
            } else {
                &mut denominator
            };
            target.push(format_factor(base.symbol(), e.abs()));
        }
        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => "-".to_string(),
            (false, true) => numerator.join("-"),
            (true, false) => format!("1/{}", denominator.join("-")),
            (false, false) => format!("{}/{}", numerator.join("-"), denominator.join("-")),
        }
    }
}

/// `symbol` or `symbol^power`, with integral powers printed without a
/// fractional part.
fn format_factor(symbol: &str, power: Real) -> String {
    if (power - 1.0).abs() < EXPONENT_EPSILON {
        symbol.to_string()
    } else if close(power, power.round(), EXPONENT_EPSILON) {
        format!("{symbol}^{}", power.round() as i64)
    } else {
        format!("{symbol}^{power}")
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        close_slices(&self.0, &other.0, EXPONENT_EPSILON)
    }
}

impl Mul for Dimension {
    type Output = Dimension;
    fn mul(self, rhs: Dimension) -> Dimension {
        let mut e = self.0;
        for (a, b) in e.iter_mut().zip(rhs.0) {
            *a += b;
        }
        Dimension(e)
    }
}

impl Div for Dimension {
    type Output = Dimension;
    fn div(self, rhs: Dimension) -> Dimension {
        self * rhs.powf(-1.0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_unit())
    }
}
