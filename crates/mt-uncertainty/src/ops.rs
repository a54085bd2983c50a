//! Operator overloads for [`Uncertain`].
//!
//! Every combination of owned / borrowed operands is supported, and a plain
//! `Real` on either side is coerced to an exact constant first.

use std::ops::{Add, Div, Mul, Neg, Sub};

use mt_core::Real;

use crate::uncertain::negated_label;
use crate::{BinaryOp, Uncertain};

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Uncertain> for &Uncertain {
            type Output = Uncertain;
            fn $method(self, rhs: &Uncertain) -> Uncertain {
                self.combine($op, rhs)
            }
        }

        impl $trait<Uncertain> for Uncertain {
            type Output = Uncertain;
            fn $method(self, rhs: Uncertain) -> Uncertain {
                self.combine($op, &rhs)
            }
        }

        impl $trait<&Uncertain> for Uncertain {
            type Output = Uncertain;
            fn $method(self, rhs: &Uncertain) -> Uncertain {
                self.combine($op, rhs)
            }
        }

        impl $trait<Uncertain> for &Uncertain {
            type Output = Uncertain;
            fn $method(self, rhs: Uncertain) -> Uncertain {
                self.combine($op, &rhs)
            }
        }

        impl $trait<Real> for &Uncertain {
            type Output = Uncertain;
            fn $method(self, rhs: Real) -> Uncertain {
                self.combine($op, &Uncertain::constant(rhs))
            }
        }

        impl $trait<Real> for Uncertain {
            type Output = Uncertain;
            fn $method(self, rhs: Real) -> Uncertain {
                self.combine($op, &Uncertain::constant(rhs))
            }
        }

        impl $trait<&Uncertain> for Real {
            type Output = Uncertain;
            fn $method(self, rhs: &Uncertain) -> Uncertain {
                Uncertain::constant(self).combine($op, rhs)
            }
        }

        impl $trait<Uncertain> for Real {
            type Output = Uncertain;
            fn $method(self, rhs: Uncertain) -> Uncertain {
                Uncertain::constant(self).combine($op, &rhs)
            }
        }
    };
}

binary_operator!(Add, add, BinaryOp::Add);
binary_operator!(Sub, sub, BinaryOp::Sub);
binary_operator!(Mul, mul, BinaryOp::Mul);
binary_operator!(Div, div, BinaryOp::Div);

/// `-x` keeps the uncertainty and ledger but takes the negated identity
/// tag, so it is not recognised as sharing an origin with `x`: `x + (-x)`
/// combines as two independent operands and has uncertainty `√2·σ`, not 0.
/// Write `&x - &x` for the correlated cancellation.
impl Neg for &Uncertain {
    type Output = Uncertain;
    fn neg(self) -> Uncertain {
        Uncertain::from_parts(
            -self.value(),
            self.uncertainty(),
            self.identity().negated(),
            negated_label(self.label()),
            self.contributions().clone(),
        )
    }
}

impl Neg for Uncertain {
    type Output = Uncertain;
    fn neg(self) -> Uncertain {
        -&self
    }
}
