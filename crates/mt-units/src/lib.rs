//! # mt-units
//!
//! Dimension-checked quantities.
//!
//! A fixed, extensible [`UnitTable`] maps unit tokens to a scale (and, for
//! affine temperature scales, an offset) and an exponent vector over
//! `[mass, length, time, temperature, amount]`.  The parser combines
//! free-form strings such as `"BTU-in/hr-ft^2-F"` into a single
//! [`ParsedUnit`], and [`DimVar`] carries any [`Magnitude`](mt_core::Magnitude)
//! (plain numbers or uncertainty values) alongside its [`Dimension`].
//!
//! ```rust
//! use mt_units::DimVar;
//!
//! let p = DimVar::new(1.0, "atm").unwrap().convert_to("pa").unwrap();
//! assert!((p.magnitude() - 101_325.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Base-dimension exponent vectors.
pub mod dimension;

/// Dimension-checked quantities.
pub mod dimvar;

/// Unit-string parsing.
pub mod parser;

/// The unit table.
pub mod table;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use dimension::{BaseDimension, Dimension};
pub use dimvar::{DimVar, Reference};
pub use parser::{parse_unit, ParsedUnit};
pub use table::{UnitEntry, UnitTable, UnitTableBuilder};
