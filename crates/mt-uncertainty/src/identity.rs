//! Correlation tags.
//!
//! Every leaf value gets a random [`Identity`].  A derived value's identity
//! is the same operator applied to its parents' identities, so two operands
//! compare equal only when they descend from the same expression over the
//! same leaves.  Equality of identities is the *only* correlation signal;
//! the tag never implies ownership.

use std::fmt;

use mt_core::Real;
use rand::Rng;

use crate::BinaryOp;

/// Opaque correlation tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity(Real);

impl Identity {
    /// Draw a fresh tag from the thread-local generator.
    ///
    /// Tags lie in `[1, 2)` so that products, quotients, and powers of tags
    /// stay finite and positive.
    pub fn fresh() -> Self {
        Self(rand::thread_rng().gen_range(1.0..2.0))
    }

    /// Deterministic tag for an exact constant, in `[1, 2)`.
    ///
    /// Equal constants share a tag, so `x * 2` computed twice is recognised
    /// as the same quantity.  Bits are mixed with the splitmix64 finalizer.
    pub fn of_constant(value: Real) -> Self {
        let mut z = value.to_bits().wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Self(1.0 + (z >> 11) as Real / (1_u64 << 53) as Real)
    }

    /// Tag of `lhs op rhs`.
    pub fn combine(op: BinaryOp, lhs: Identity, rhs: Identity) -> Self {
        Self(op.apply(lhs.0, rhs.0))
    }

    /// Tag of `-x`.
    pub fn negated(self) -> Self {
        Self(-self.0)
    }

    /// `true` if both tags denote the same statistical origin.
    pub fn correlated_with(self, other: Identity) -> bool {
        self.0 == other.0
    }

    /// Raw tag value.
    pub fn raw(self) -> Real {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:.12}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tags_differ() {
        let a = Identity::fresh();
        let b = Identity::fresh();
        assert!(!a.correlated_with(b));
        assert!((1.0..2.0).contains(&a.raw()));
    }

    #[test]
    fn combination_is_deterministic() {
        let a = Identity::fresh();
        let b = Identity::fresh();
        let s1 = Identity::combine(BinaryOp::Add, a, b);
        let s2 = Identity::combine(BinaryOp::Add, a, b);
        assert!(s1.correlated_with(s2));
        assert!(!s1.correlated_with(Identity::combine(BinaryOp::Mul, a, b)));
    }

    #[test]
    fn constant_tags_are_stable() {
        let t = Identity::of_constant(2.0);
        assert!(t.correlated_with(Identity::of_constant(2.0)));
        assert!(!t.correlated_with(Identity::of_constant(3.0)));
        assert!((1.0..2.0).contains(&t.raw()));
    }

    #[test]
    fn negation_changes_tag() {
        let a = Identity::fresh();
        assert!(!a.correlated_with(a.negated()));
        assert!(a.correlated_with(a.negated().negated()));
    }
}
