//! Straight-line extrapolation with a split error budget.
//!
//! [`project`] fits $y = b + m x$ and evaluates it at `x0`.  Each reported
//! quantity (the projection, the slope, the intercept) carries two
//! independent error sources, combined in quadrature:
//!
//! * **statistical**: the fit's own scatter.  For the projection this is the
//!   prediction-interval error of a new observation at `x0`,
//!   $\hat\sigma\sqrt{1 + 1/n + (x_0 - \bar x)^2 / S_{xx}}$; for the slope
//!   and intercept it is their standard error.  Zero for two points, which
//!   always fit exactly;
//! * **propagated**: the per-point input uncertainties `ex`, `ey` pushed
//!   through the closed-form OLS slope and intercept
//!
//!   $m = \dfrac{n\sum xy - \sum x \sum y}{D}, \quad
//!    b = \dfrac{\sum y \sum x^2 - \sum x \sum xy}{D}, \quad
//!    D = n\sum x^2 - \left(\sum x\right)^2$
//!
//!   by first-order partial derivatives, with the projection's share
//!   $\sqrt{(x_0\sigma_m)^2 + \sigma_b^2}$.

use std::fmt;

use log::debug;
use mt_core::{fail, Error, Real, Result, Settings};
use mt_uncertainty::{Uncertain, UncertainArray};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::regression::LinearRegression;

/// A fitted value with its error split by source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Best estimate.
    pub value: Real,
    /// Combined error, `hypot(err_stat, err_proj)`.
    pub err: Real,
    /// Error from the fit residuals.
    pub err_stat: Real,
    /// Error propagated from the input uncertainties.
    pub err_proj: Real,
}

impl Estimate {
    fn new(value: Real, err_stat: Real, err_proj: Real) -> Self {
        Self {
            value,
            err: err_stat.hypot(err_proj),
            err_stat,
            err_proj,
        }
    }

    /// The estimate as an uncertainty value with the combined error.
    pub fn as_uncertain(&self) -> Uncertain {
        Uncertain::new(self.value, self.err)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = Settings::instance();
        write!(
            f,
            "{} ± {} (stat {}, proj {})",
            settings.format_real(self.value),
            settings.format_real(self.err),
            settings.format_real(self.err_stat),
            settings.format_real(self.err_proj)
        )
    }
}

/// Result of [`project`].
#[derive(Debug, Clone)]
pub struct LinearProjection {
    x0: Real,
    observations: usize,
    projection: Estimate,
    slope: Estimate,
    intercept: Estimate,
}

impl LinearProjection {
    /// Where the line was evaluated.
    pub fn x0(&self) -> Real {
        self.x0
    }

    /// Number of points fitted.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Projected value at `x0`.
    pub fn value(&self) -> Real {
        self.projection.value
    }

    /// Combined error of the projected value.
    pub fn err(&self) -> Real {
        self.projection.err
    }

    /// Statistical error of the projected value.
    pub fn err_stat(&self) -> Real {
        self.projection.err_stat
    }

    /// Input-propagated error of the projected value.
    pub fn err_proj(&self) -> Real {
        self.projection.err_proj
    }

    /// The projected value with its error budget.
    pub fn projection(&self) -> &Estimate {
        &self.projection
    }

    /// The fitted slope.
    pub fn slope(&self) -> &Estimate {
        &self.slope
    }

    /// The fitted intercept.
    pub fn intercept(&self) -> &Estimate {
        &self.intercept
    }

    /// The projected value as an uncertainty value.
    pub fn as_uncertain(&self) -> Uncertain {
        self.projection.as_uncertain()
    }

    /// Two-sided interval at `level` (e.g. `0.95`) for a new observation
    /// at `x0`, scaling the statistical error by the Student-t quantile
    /// with n − 2 degrees of freedom.
    pub fn confidence_interval(&self, level: Real) -> Result<(Real, Real)> {
        if !(level > 0.0 && level < 1.0) {
            fail!("confidence level must lie in (0, 1), got {level}");
        }
        if self.observations < 3 {
            fail!(
                "a confidence interval needs at least three points, got {}",
                self.observations
            );
        }
        let dof = (self.observations - 2) as Real;
        let t = StudentsT::new(0.0, 1.0, dof)
            .map_err(|e| Error::InvalidArgument(e.to_string()))?
            .inverse_cdf(0.5 + level / 2.0);
        let half_width = t * self.projection.err_stat;
        Ok((self.value() - half_width, self.value() + half_width))
    }
}

impl fmt::Display for LinearProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y({}) = {}", self.x0, self.projection)
    }
}

/// Fit a line through `(x, y)` and project it to `x0`.
///
/// `ex` and `ey` are the standard uncertainties of each point.  All four
/// slices must have the same length n ≥ 2, and the `x` values must not all
/// be equal.
pub fn project(
    x: &[Real],
    y: &[Real],
    ex: &[Real],
    ey: &[Real],
    x0: Real,
) -> Result<LinearProjection> {
    let n = x.len();
    if y.len() != n || ex.len() != n || ey.len() != n {
        fail!(
            "x, y, ex and ey must have equal lengths, got {}, {}, {} and {}",
            n,
            y.len(),
            ex.len(),
            ey.len()
        );
    }

    let fit = LinearRegression::line(x, y)?;
    let intercept = fit.coefficients()[0];
    let slope = fit.coefficients()[1];
    let se = fit.standard_errors();

    let (sigma_m, sigma_b) = input_uncertainty(x, y, ex, ey, slope, intercept);

    let projection = Estimate::new(
        intercept + slope * x0,
        (fit.prediction_variance(&[1.0, x0])? + fit.residual_variance()).sqrt(),
        (x0 * sigma_m).hypot(sigma_b),
    );
    debug!("projected {n} points to x0 = {x0}: {projection}");

    Ok(LinearProjection {
        x0,
        observations: n,
        projection,
        slope: Estimate::new(slope, se[1], sigma_m),
        intercept: Estimate::new(intercept, se[0], sigma_b),
    })
}

/// [`project`] taking the values and uncertainties from uncertainty arrays.
pub fn project_uncertain(
    x: &UncertainArray,
    y: &UncertainArray,
    x0: Real,
) -> Result<LinearProjection> {
    if x.shape() != y.shape() {
        return Err(Error::ShapeMismatch {
            left: x.shape().to_vec(),
            right: y.shape().to_vec(),
        });
    }
    project(
        &x.values(),
        &y.values(),
        &x.uncertainties(),
        &y.uncertainties(),
        x0,
    )
}

/// σ_m and σ_b from the per-point input uncertainties.
fn input_uncertainty(
    x: &[Real],
    y: &[Real],
    ex: &[Real],
    ey: &[Real],
    slope: Real,
    intercept: Real,
) -> (Real, Real) {
    let n = x.len() as Real;
    let sx: Real = x.iter().sum();
    let sy: Real = y.iter().sum();
    let sxx: Real = x.iter().map(|xi| xi * xi).sum();
    let sxy: Real = x.iter().zip(y).map(|(xi, yi)| xi * yi).sum();
    let d = n * sxx - sx * sx;

    let mut var_m = 0.0;
    let mut var_b = 0.0;
    for (((&xi, &yi), &exi), &eyi) in x.iter().zip(y).zip(ex).zip(ey) {
        // ∂D/∂xᵢ
        let dd_dx = 2.0 * (n * xi - sx);

        let dm_dx = (n * yi - sy - slope * dd_dx) / d;
        let dm_dy = (n * xi - sx) / d;
        let db_dx = (2.0 * sy * xi - sxy - sx * yi - intercept * dd_dx) / d;
        let db_dy = (sxx - sx * xi) / d;

        var_m += (dm_dx * exi).powi(2) + (dm_dy * eyi).powi(2);
        var_b += (db_dx * exi).powi(2) + (db_dy * eyi).powi(2);
    }
    (var_m.sqrt(), var_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn exact_fit_without_input_errors() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let zeros = [0.0; 4];
        let p = project(&x, &x, &zeros, &zeros, 5.0).unwrap();
        assert_abs_diff_eq!(p.value(), 5.0, epsilon = 1e-10);
        assert_abs_diff_eq!(p.err(), 0.0, epsilon = 1e-10);
        assert_eq!(p.err_proj(), 0.0);
        assert_abs_diff_eq!(p.slope().value, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.intercept().value, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn statistical_error_is_prediction_interval() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.1, 0.9, 2.2, 2.8, 4.1];
        let zeros = [0.0; 5];
        let x0 = 7.0;
        let p = project(&x, &y, &zeros, &zeros, x0).unwrap();

        let n = x.len() as Real;
        let mean = x.iter().sum::<Real>() / n;
        let sxx: Real = x.iter().map(|xi| (xi - mean).powi(2)).sum();
        let ssr: Real = x
            .iter()
            .zip(&y)
            .map(|(xi, yi)| (yi - p.intercept().value - p.slope().value * xi).powi(2))
            .sum();
        let s = (ssr / (n - 2.0)).sqrt();
        let expected = s * (1.0 + 1.0 / n + (x0 - mean).powi(2) / sxx).sqrt();
        assert_abs_diff_eq!(p.err_stat(), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(p.err_stat(), 0.363_27, epsilon = 1e-5);
        assert_abs_diff_eq!(p.slope().err_stat, s / sxx.sqrt(), epsilon = 1e-12);
        assert_eq!(p.err(), p.err_stat());
    }

    #[test]
    fn y_errors_only() {
        // With ex = 0 and equal ey = σ the propagated slope error is σ/√Sxx.
        let x = [1.0, 2.0, 4.0, 7.0];
        let y = [2.0, 3.5, 8.0, 13.0];
        let ey = [0.2; 4];
        let p = project(&x, &y, &[0.0; 4], &ey, 0.0).unwrap();
        let mean = x.iter().sum::<Real>() / 4.0;
        let sxx: Real = x.iter().map(|xi| (xi - mean).powi(2)).sum();
        assert_abs_diff_eq!(p.slope().err_proj, 0.2 / sxx.sqrt(), epsilon = 1e-12);
        // at x0 = 0 the projection is the intercept
        assert_abs_diff_eq!(p.err_proj(), p.intercept().err_proj, epsilon = 1e-12);
    }

    #[test]
    fn x_sensitivity_matches_finite_difference() {
        let x = [0.0, 1.5, 2.0, 4.0, 5.5];
        let y = [1.0, 2.0, 4.5, 6.0, 9.5];
        let k = 2;
        let mut ex = [0.0; 5];
        ex[k] = 1.0;
        let p = project(&x, &y, &ex, &[0.0; 5], 1.0).unwrap();

        let h = 1e-6;
        let refit = |dx: Real| {
            let mut shifted = x;
            shifted[k] += dx;
            let fit = LinearRegression::line(&shifted, &y).unwrap();
            (fit.coefficients()[1], fit.coefficients()[0])
        };
        let ((m_hi, b_hi), (m_lo, b_lo)) = (refit(h), refit(-h));
        let dm = ((m_hi - m_lo) / (2.0 * h)).abs();
        let db = ((b_hi - b_lo) / (2.0 * h)).abs();
        assert_abs_diff_eq!(p.slope().err_proj, dm, epsilon = 1e-6);
        assert_abs_diff_eq!(p.intercept().err_proj, db, epsilon = 1e-6);
    }

    #[test]
    fn rejects_bad_inputs() {
        let one = [1.0];
        assert!(matches!(
            project(&one, &one, &one, &one, 0.0),
            Err(Error::InvalidArgument(_))
        ));
        let x = [1.0, 2.0];
        assert!(matches!(
            project(&x, &x, &x, &one, 0.0),
            Err(Error::InvalidArgument(_))
        ));
        let same = [3.0, 3.0, 3.0];
        assert!(matches!(
            project(&same, &[1.0, 2.0, 3.0], &same, &same, 0.0),
            Err(Error::InvalidArgument(_))
        ));
    }
}
