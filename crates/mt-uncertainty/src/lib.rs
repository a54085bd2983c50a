//! # mt-uncertainty
//!
//! First-order (linearised) uncertainty propagation.
//!
//! An [`Uncertain`] value carries a best estimate, a standard uncertainty,
//! a correlation [`Identity`], a derivation label, and a [`Contributions`]
//! ledger recording which named leaves account for what share of its
//! variance.  Arithmetic, powers, and the elementary [`Function`]s all
//! propagate these; [`UncertainArray`] adds shaped collections with
//! broadcasting, reductions, and a provenance-preserving matrix product.
//!
//! ```rust
//! use mt_uncertainty::Uncertain;
//!
//! let x = Uncertain::named(2.0, 1.0, "x");
//! let y = Uncertain::named(2.0, 1.0, "y");
//!
//! // Same origin: fully correlated.
//! assert!(((&x * &x).uncertainty() - 4.0).abs() < 1e-12);
//! // Independent.
//! assert!(((&x * &y).uncertainty() - 8.0_f64.sqrt()).abs() < 1e-12);
//! assert_eq!((&x - &x).uncertainty(), 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Shaped arrays of uncertainty values.
pub mod array;

/// The provenance ledger.
pub mod contributions;

/// Elementary functions and their derivatives.
pub mod function;

/// Correlation tags.
pub mod identity;

/// Operator overloads.
mod ops;

/// Binary-operator propagation rules.
pub mod propagation;

/// The scalar uncertainty value.
pub mod uncertain;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::UncertainArray;
pub use contributions::Contributions;
pub use function::Function;
pub use identity::Identity;
pub use propagation::BinaryOp;
pub use uncertain::Uncertain;
