//! Elementary functions with their first derivatives.
//!
//! A single-argument function propagates uncertainty as
//! `σ_y = |f'(x)| · σ_x`; [`Function::apply`] returns both `f(x)` and
//! `f'(x)` so callers never need a separate derivative table.

use std::fmt;

use mt_core::Real;

/// Elementary function of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Cosecant.
    Csc,
    /// Secant.
    Sec,
    /// Cotangent.
    Cot,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Inverse secant.
    Asec,
    /// Inverse cosecant.
    Acsc,
    /// Inverse cotangent.
    Acot,
    /// Square root.
    Sqrt,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
    /// Base-10 logarithm.
    Log10,
    /// Base-2 logarithm.
    Log2,
    /// Absolute value.
    Abs,
}

impl Function {
    /// Every supported function.
    pub const ALL: [Function; 18] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Csc,
        Function::Sec,
        Function::Cot,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Asec,
        Function::Acsc,
        Function::Acot,
        Function::Sqrt,
        Function::Exp,
        Function::Log,
        Function::Log10,
        Function::Log2,
        Function::Abs,
    ];

    /// Evaluate `(f(x), f'(x))`.
    ///
    /// Out-of-domain arguments follow IEEE semantics (NaN / ±∞).
    pub fn apply(self, x: Real) -> (Real, Real) {
        match self {
            Function::Sin => (x.sin(), x.cos()),
            Function::Cos => (x.cos(), -x.sin()),
            Function::Tan => {
                let c = x.cos();
                (x.tan(), 1.0 / (c * c))
            }
            Function::Csc => {
                let csc = 1.0 / x.sin();
                (csc, -csc / x.tan())
            }
            Function::Sec => {
                let sec = 1.0 / x.cos();
                (sec, sec * x.tan())
            }
            Function::Cot => {
                let s = x.sin();
                (1.0 / x.tan(), -1.0 / (s * s))
            }
            Function::Asin => (x.asin(), 1.0 / (1.0 - x * x).sqrt()),
            Function::Acos => (x.acos(), -1.0 / (1.0 - x * x).sqrt()),
            Function::Atan => (x.atan(), 1.0 / (1.0 + x * x)),
            Function::Asec => ((1.0 / x).acos(), 1.0 / (x.abs() * (x * x - 1.0).sqrt())),
            Function::Acsc => ((1.0 / x).asin(), -1.0 / (x.abs() * (x * x - 1.0).sqrt())),
            Function::Acot => ((1.0 / x).atan(), -1.0 / (1.0 + x * x)),
            Function::Sqrt => {
                let r = x.sqrt();
                (r, 0.5 / r)
            }
            Function::Exp => {
                let e = x.exp();
                (e, e)
            }
            Function::Log => (x.ln(), 1.0 / x),
            Function::Log10 => (x.log10(), 1.0 / (x * std::f64::consts::LN_10)),
            Function::Log2 => (x.log2(), 1.0 / (x * std::f64::consts::LN_2)),
            // d|x|/dx at 0 is taken as 0, so an exact zero stays exact.
            Function::Abs => (x.abs(), if x == 0.0 { 0.0 } else { x.signum() }),
        }
    }

    /// Name used when rendering labels.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Csc => "csc",
            Function::Sec => "sec",
            Function::Cot => "cot",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Asec => "asec",
            Function::Acsc => "acsc",
            Function::Acot => "acot",
            Function::Sqrt => "sqrt",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Log2 => "log2",
            Function::Abs => "abs",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Central finite difference.
    fn numeric_derivative(f: Function, x: Real) -> Real {
        let h = 1e-6;
        (f.apply(x + h).0 - f.apply(x - h).0) / (2.0 * h)
    }

    #[test]
    fn derivatives_match_finite_differences() {
        for f in Function::ALL {
            // Inside every domain: |x| > 1 for asec/acsc, |x| < 1 for asin/acos.
            let x = match f {
                Function::Asec | Function::Acsc => 1.7,
                Function::Abs => -0.6,
                _ => 0.6,
            };
            let (_, analytic) = f.apply(x);
            let numeric = numeric_derivative(f, x);
            assert!(
                (analytic - numeric).abs() < 1e-6 * (1.0 + numeric.abs()),
                "{f}: analytic {analytic}, numeric {numeric}"
            );
        }
    }

    #[test]
    fn inverse_reciprocal_functions() {
        let (y, _) = Function::Asec.apply(2.0);
        assert!((y - std::f64::consts::FRAC_PI_3).abs() < 1e-12);
        let (y, _) = Function::Acot.apply(1.0);
        assert!((y - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn log_of_negative_is_nan() {
        assert!(Function::Log.apply(-1.0).0.is_nan());
    }
}
