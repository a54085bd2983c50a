//! # mt-core
//!
//! Core types, traits, and error definitions for metrology-rs.
//!
//! This crate provides the building blocks shared across the workspace: the
//! `Real` alias, the error hierarchy with its `ensure!` / `fail!` macros,
//! global display `Settings`, float comparison helpers, and the
//! [`Magnitude`] trait that lets a dimensioned quantity carry either a plain
//! number or an uncertainty-tracking value.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// The numeric interface shared by every magnitude type.
pub mod magnitude;

/// Global library settings (display precision).
pub mod settings;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use comparison::{close, close_slices};
pub use errors::{Error, Result};
pub use magnitude::Magnitude;
pub use settings::{ScopedDisplayPrecision, Settings};
