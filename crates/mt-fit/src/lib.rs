//! # mt-fit
//!
//! Least-squares line fitting and linear projection with a split error
//! budget: the fit's statistical scatter and the input uncertainties
//! propagated through the closed-form slope and intercept.
//!
//! ```rust
//! use mt_fit::project;
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let p = project(&x, &x, &[0.0; 4], &[0.0; 4], 5.0).unwrap();
//! assert!((p.value() - 5.0).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Line projection with statistical and propagated errors.
pub mod projection;

/// SVD-based ordinary least squares.
pub mod regression;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use projection::{project, project_uncertain, Estimate, LinearProjection};
pub use regression::LinearRegression;
