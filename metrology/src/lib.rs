//! # metrology
//!
//! Measurement arithmetic for engineering calculations: values that carry
//! their standard uncertainty and a ledger of where it came from, quantities
//! that carry their physical dimension, and a straight-line projection that
//! reports both the fit scatter and the propagated input error.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `mt-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! metrology = "0.1"
//! ```
//!
//! ```rust
//! use metrology::uncertainty::Uncertain;
//! use metrology::units::DimVar;
//!
//! let span = DimVar::uncertain(12.0, 0.1, "span", "ft").unwrap();
//! let time = DimVar::uncertain(3.0, 0.05, "time", "s").unwrap();
//! let speed = (&span / &time).unwrap().convert_to("m/s").unwrap();
//!
//! assert_eq!(speed.unit(), "m/s");
//! let v: Uncertain = speed.magnitude();
//! assert!((v.value() - 1.2192).abs() < 1e-12);
//! assert!(v.contributions().get("time").unwrap() > v.contributions().get("span").unwrap());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, settings, and error definitions.
pub use mt_core as core;

/// Uncertainty values, arrays, and propagation rules.
pub use mt_uncertainty as uncertainty;

/// Unit table, unit parsing, and dimension-checked quantities.
pub use mt_units as units;

/// Least-squares fitting and linear projection.
pub use mt_fit as fit;
