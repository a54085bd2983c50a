//! Error types for metrology-rs.
//!
//! Every failure the value types can raise is a variant of a single
//! `thiserror`-derived enum.  Failures are programmer-input errors (bad unit
//! strings, incompatible shapes or dimensions) and abort the operation that
//! triggered them; there is no recovery policy.

use thiserror::Error;

/// The top-level error type used throughout metrology-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Operand shapes are incompatible and cannot be broadcast.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Shape of the left operand.
        left: Vec<usize>,
        /// Shape of the right operand.
        right: Vec<usize>,
    },

    /// Dimension vectors differ on an operation that requires equality.
    #[error("unit mismatch: cannot {op} [{left}] and [{right}]")]
    UnitMismatch {
        /// Canonical unit of the left operand.
        left: String,
        /// Canonical unit of the right operand.
        right: String,
        /// Name of the operation that was attempted.
        op: String,
    },

    /// A token in a unit string is not in the unit table.
    #[error("unknown unit: '{0}'")]
    UnknownUnit(String),

    /// The unit string cannot be parsed.
    #[error("malformed unit string: '{0}'")]
    MalformedUnit(String),

    /// An exponent operand carries units.
    #[error("exponent must be dimensionless, got [{0}]")]
    NonDimensionlessExponent(String),

    /// A power suffix in a unit token is not a number.
    #[error("invalid exponent: '{0}'")]
    InvalidExponent(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Precondition violated (raised by [`ensure!`](crate::ensure)).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),
}

/// Shorthand `Result` type used throughout metrology-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use mt_core::{ensure, errors::Error};
/// fn positive(x: f64) -> mt_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidArgument(...))` immediately.
///
/// # Example
/// ```
/// use mt_core::{fail, errors::Error};
/// fn always_err() -> mt_core::errors::Result<()> {
///     fail!("bad input {}", 3);
/// }
/// assert_eq!(
///     always_err(),
///     Err(Error::InvalidArgument("bad input 3".into()))
/// );
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::InvalidArgument(format!($($msg)*)))
    };
}
