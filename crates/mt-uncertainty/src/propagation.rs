//! First-order propagation for binary operators.
//!
//! For `y = a ⊕ b` the propagated standard uncertainty is
//!
//! $$\sigma_y^2 = (\partial_a y\,\sigma_a)^2 + (\partial_b y\,\sigma_b)^2
//!   + 2\rho\,(\partial_a y\,\sigma_a)(\partial_b y\,\sigma_b)$$
//!
//! with `ρ = 1` when both operands carry the same [`Identity`] and `ρ = 0`
//! otherwise.  The two partial-variance terms also decide how the operands'
//! contribution ledgers are merged.

use std::fmt;

use log::{trace, warn};
use mt_core::Real;

use crate::{Contributions, Identity, Uncertain};

/// Binary operator over uncertainty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `a ^ b`
    Pow,
}

impl BinaryOp {
    /// Plain arithmetic on two reals.
    #[inline]
    pub fn apply(self, a: Real, b: Real) -> Real {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }

    /// Partial derivatives `(∂y/∂a, ∂y/∂b)` where `y = a ⊕ b`.
    pub fn partials(self, a: Real, b: Real, y: Real) -> (Real, Real) {
        match self {
            BinaryOp::Add => (1.0, 1.0),
            BinaryOp::Sub => (1.0, -1.0),
            BinaryOp::Mul => (b, a),
            BinaryOp::Div => (1.0 / b, -a / (b * b)),
            BinaryOp::Pow => (b * a.powf(b - 1.0), a.ln() * y),
        }
    }

    /// Operator symbol used in labels.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    /// Verb used in error messages.
    pub fn verb(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "subtract",
            BinaryOp::Mul => "multiply",
            BinaryOp::Div => "divide",
            BinaryOp::Pow => "raise",
        }
    }

    /// Build the label of `lhs ⊕ rhs`.
    ///
    /// Sums and differences are wrapped in parentheses themselves; products,
    /// quotients, and powers parenthesize any operand that is not atomic.
    pub fn label(self, lhs: &str, rhs: &str) -> String {
        match self {
            BinaryOp::Add | BinaryOp::Sub => format!("({lhs}{}{rhs})", self.symbol()),
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow => {
                format!("{}{}{}", grouped(lhs), self.symbol(), grouped(rhs))
            }
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `true` if `label` has an operator outside every pair of parentheses.
fn has_top_level_operator(label: &str) -> bool {
    let mut depth = 0_i32;
    for c in label.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' | '-' | '*' | '/' | '^' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Wrap `label` in parentheses unless it is already atomic.
pub(crate) fn grouped(label: &str) -> String {
    if has_top_level_operator(label) {
        format!("({label})")
    } else {
        label.to_string()
    }
}

/// Uncertainty term `∂y/∂x · σ_x`.  An exact operand contributes nothing,
/// even where the derivative is undefined (e.g. `ln` of a negative base).
#[inline]
fn partial_term(derivative: Real, sigma: Real) -> Real {
    if sigma == 0.0 {
        0.0
    } else {
        derivative * sigma
    }
}

/// Propagate `lhs ⊕ rhs`.
pub(crate) fn propagate(op: BinaryOp, lhs: &Uncertain, rhs: &Uncertain) -> Uncertain {
    let (a, b) = (lhs.value(), rhs.value());
    let y = op.apply(a, b);
    let (da, db) = op.partials(a, b, y);

    let term_a = partial_term(da, lhs.uncertainty());
    let term_b = partial_term(db, rhs.uncertainty());
    let rho = if lhs.identity().correlated_with(rhs.identity()) {
        1.0
    } else {
        0.0
    };

    let variance = term_a * term_a + term_b * term_b + 2.0 * rho * term_a * term_b;
    // Full cancellation may leave a rounding residue just below zero.
    let sigma = if variance < 0.0 { 0.0 } else { variance.sqrt() };

    let contributions = merge_ledgers(term_a, term_b, sigma, lhs, rhs);

    Uncertain::from_parts(
        y,
        sigma,
        Identity::combine(op, lhs.identity(), rhs.identity()),
        op.label(lhs.label(), rhs.label()),
        contributions,
    )
}

/// Ledger of a result whose two partial-variance terms are `term_a` and
/// `term_b`.
///
/// Each side's share is its partial variance over the sum of both partial
/// variances, which equals `σ_y²` for independent operands and keeps the
/// shares summing to one for correlated ones.
fn merge_ledgers(
    term_a: Real,
    term_b: Real,
    sigma: Real,
    lhs: &Uncertain,
    rhs: &Uncertain,
) -> Contributions {
    let var_a = term_a * term_a;
    let var_b = term_b * term_b;
    let share_a = var_a / (var_a + var_b);
    let share_b = var_b / (var_a + var_b);

    if sigma == 0.0 || share_a.is_nan() || share_b.is_nan() {
        trace!(
            "contribution short-circuit for {} and {} (sigma = {sigma})",
            lhs.label(),
            rhs.label()
        );
        return if term_a != 0.0 {
            lhs.contributions().clone()
        } else if term_b != 0.0 {
            rhs.contributions().clone()
        } else {
            Contributions::new()
        };
    }

    let merged = Contributions::merge(share_a, lhs.contributions(), share_b, rhs.contributions());
    if merged.is_indeterminate() {
        warn!(
            "indeterminate contribution ledger for {} and {}",
            lhs.label(),
            rhs.label()
        );
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn grouping_rules() {
        assert_eq!(grouped("x"), "x");
        assert_eq!(grouped("(x+y)"), "(x+y)");
        assert_eq!(grouped("sin(x+y)"), "sin(x+y)");
        assert_eq!(grouped("x*y"), "(x*y)");
        assert_eq!(grouped("-2"), "(-2)");
        assert_eq!(grouped("(a+b)*(c-d)"), "((a+b)*(c-d))");
    }

    #[test]
    fn labels_per_operator() {
        assert_eq!(BinaryOp::Add.label("x", "y"), "(x+y)");
        assert_eq!(BinaryOp::Sub.label("x", "(y+z)"), "(x-(y+z))");
        assert_eq!(BinaryOp::Mul.label("(x+y)", "z"), "(x+y)*z");
        assert_eq!(BinaryOp::Div.label("x*y", "z"), "(x*y)/z");
        assert_eq!(BinaryOp::Pow.label("x", "2"), "x^2");
    }

    #[test]
    fn power_partials() {
        let (a, b) = (2.0_f64, 3.0_f64);
        let y = BinaryOp::Pow.apply(a, b);
        let (da, db) = BinaryOp::Pow.partials(a, b, y);
        assert_abs_diff_eq!(y, 8.0);
        assert_abs_diff_eq!(da, 12.0);
        assert_abs_diff_eq!(db, 8.0 * 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn exact_operand_has_no_term() {
        assert_eq!(partial_term(Real::NAN, 0.0), 0.0);
        assert_eq!(partial_term(2.0, 0.5), 1.0);
    }
}
