//! [`Uncertain`]: a scalar that carries its standard uncertainty, a
//! correlation tag, a derivation label, and a contribution ledger.

use std::cmp::Ordering;
use std::fmt;

use mt_core::{Magnitude, Real, Result, Settings};

use crate::propagation::{grouped, propagate};
use crate::{BinaryOp, Contributions, Function, Identity};

/// A measured value with first-order uncertainty tracking.
///
/// Instances are immutable; every operation returns a new value whose
/// identity, label, and contributions are derived from the operands.
/// Negation also yields a new identity, so `x + (-x)` is treated as a sum
/// of independent values (see the `Neg` impl).
#[derive(Debug, Clone)]
pub struct Uncertain {
    value: Real,
    uncertainty: Real,
    identity: Identity,
    label: String,
    contributions: Contributions,
}

/// Decimal rendering of a literal, used as its label.
pub(crate) fn literal_label(x: Real) -> String {
    format!("{x}")
}

/// Ledger key of an unnamed leaf: its label followed by its tag, so two
/// independent leaves with equal values stay separate contributors.
pub(crate) fn unnamed_key(label: &str, identity: Identity) -> String {
    format!("{label}{identity}")
}

impl Uncertain {
    /// Unnamed leaf.  Its label is the decimal rendering of `value`; its
    /// ledger entry is that label suffixed with the identity tag.
    ///
    /// The sign of `uncertainty` is ignored.
    pub fn new(value: Real, uncertainty: Real) -> Self {
        let identity = Identity::fresh();
        let label = literal_label(value);
        let key = unnamed_key(&label, identity);
        Self::leaf_with_identity(value, uncertainty, label, key, identity)
    }

    /// Named leaf with a fresh identity.  The name becomes both its label
    /// and its single contribution entry.
    pub fn named(value: Real, uncertainty: Real, name: impl Into<String>) -> Self {
        let label = name.into();
        Self::leaf_with_identity(value, uncertainty, label.clone(), label, Identity::fresh())
    }

    /// Exact constant, as used when a plain number meets an uncertainty
    /// value.  It has no ledger entry and a tag derived from its value.
    pub fn constant(value: Real) -> Self {
        Self {
            value,
            uncertainty: 0.0,
            identity: Identity::of_constant(value),
            label: literal_label(value),
            contributions: Contributions::new(),
        }
    }

    /// Leaf with a given identity, recorded in the ledger under `key`.
    pub(crate) fn leaf_with_identity(
        value: Real,
        uncertainty: Real,
        label: String,
        key: String,
        identity: Identity,
    ) -> Self {
        Self {
            value,
            uncertainty: uncertainty.abs(),
            identity,
            label,
            contributions: Contributions::leaf(key),
        }
    }

    pub(crate) fn from_parts(
        value: Real,
        uncertainty: Real,
        identity: Identity,
        label: String,
        contributions: Contributions,
    ) -> Self {
        Self {
            value,
            uncertainty,
            identity,
            label,
            contributions,
        }
    }

    /// Best estimate.
    pub fn value(&self) -> Real {
        self.value
    }

    /// Standard (1σ) uncertainty.
    pub fn uncertainty(&self) -> Real {
        self.uncertainty
    }

    /// Relative uncertainty `σ / |value|`.
    pub fn relative_uncertainty(&self) -> Real {
        self.uncertainty / self.value.abs()
    }

    /// Correlation tag.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Expression this value was derived from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fractional share of the variance per leaf.
    pub fn contributions(&self) -> &Contributions {
        &self.contributions
    }

    /// `self ⊕ rhs` with full propagation.
    pub fn combine(&self, op: BinaryOp, rhs: &Uncertain) -> Uncertain {
        propagate(op, self, rhs)
    }

    /// `self ^ exponent`.
    pub fn pow(&self, exponent: &Uncertain) -> Uncertain {
        self.combine(BinaryOp::Pow, exponent)
    }

    /// `self ^ exponent` for an exact exponent.
    pub fn powf(&self, exponent: Real) -> Uncertain {
        self.combine(BinaryOp::Pow, &Uncertain::constant(exponent))
    }

    /// `f(self)`: `σ_y = |f'(x)| σ_x`.  Identity and ledger carry over.
    pub fn apply(&self, function: Function) -> Uncertain {
        let (y, dy) = function.apply(self.value);
        let sigma = if self.uncertainty == 0.0 {
            0.0
        } else {
            dy.abs() * self.uncertainty
        };
        Self {
            value: y,
            uncertainty: sigma,
            identity: self.identity,
            label: format!("{}({})", function.name(), self.label),
            contributions: self.contributions.clone(),
        }
    }

    /// Multiply by an exact factor without treating it as an independent
    /// operand.  Identity, label, and ledger are unchanged.
    pub fn scale(&self, factor: Real) -> Uncertain {
        Self {
            value: self.value * factor,
            uncertainty: self.uncertainty * factor.abs(),
            ..self.clone()
        }
    }

    /// Add an exact offset.  Identity, label, and ledger are unchanged.
    pub fn shift(&self, offset: Real) -> Uncertain {
        Self {
            value: self.value + offset,
            ..self.clone()
        }
    }
}

macro_rules! elementary {
    ($($(#[$doc:meta])* $method:ident => $function:ident),* $(,)?) => {
        impl Uncertain {
            $(
                $(#[$doc])*
                pub fn $method(&self) -> Uncertain {
                    self.apply(Function::$function)
                }
            )*
        }
    };
}

elementary! {
    /// Sine.
    sin => Sin,
    /// Cosine.
    cos => Cos,
    /// Tangent.
    tan => Tan,
    /// Cosecant.
    csc => Csc,
    /// Secant.
    sec => Sec,
    /// Cotangent.
    cot => Cot,
    /// Inverse sine.
    asin => Asin,
    /// Inverse cosine.
    acos => Acos,
    /// Inverse tangent.
    atan => Atan,
    /// Inverse secant.
    asec => Asec,
    /// Inverse cosecant.
    acsc => Acsc,
    /// Inverse cotangent.
    acot => Acot,
    /// Square root.
    sqrt => Sqrt,
    /// Natural exponential.
    exp => Exp,
    /// Natural logarithm.
    log => Log,
    /// Base-10 logarithm.
    log10 => Log10,
    /// Base-2 logarithm.
    log2 => Log2,
    /// Absolute value.
    abs => Abs,
}

// ── Comparison (magnitude only) ───────────────────────────────────────────────

impl PartialEq for Uncertain {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Uncertain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl PartialEq<Real> for Uncertain {
    fn eq(&self, other: &Real) -> bool {
        self.value == *other
    }
}

impl PartialOrd<Real> for Uncertain {
    fn partial_cmp(&self, other: &Real) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

// ── Conversions & display ─────────────────────────────────────────────────────

impl From<Real> for Uncertain {
    fn from(x: Real) -> Self {
        Uncertain::constant(x)
    }
}

impl fmt::Display for Uncertain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = Settings::instance();
        write!(
            f,
            "{} ± {}",
            settings.format_real(self.value),
            settings.format_real(self.uncertainty)
        )
    }
}

impl Magnitude for Uncertain {
    fn from_real(x: Real) -> Self {
        Uncertain::constant(x)
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        Ok(self.combine(BinaryOp::Add, rhs))
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        Ok(self.combine(BinaryOp::Sub, rhs))
    }

    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        Ok(self.combine(BinaryOp::Mul, rhs))
    }

    fn try_div(&self, rhs: &Self) -> Result<Self> {
        Ok(self.combine(BinaryOp::Div, rhs))
    }

    fn try_pow(&self, rhs: &Self) -> Result<Self> {
        Ok(self.pow(rhs))
    }

    fn negate(&self) -> Self {
        -self
    }

    fn scale(&self, factor: Real) -> Self {
        Uncertain::scale(self, factor)
    }

    fn shift(&self, offset: Real) -> Self {
        Uncertain::shift(self, offset)
    }

    fn sqrt(&self) -> Self {
        self.apply(Function::Sqrt)
    }

    fn exponent_value(&self) -> Result<Real> {
        Ok(self.value)
    }
}

/// Label of `-x`.
pub(crate) fn negated_label(label: &str) -> String {
    format!("-{}", grouped(label))
}
