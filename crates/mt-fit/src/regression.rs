//! Ordinary least-squares regression.
//!
//! Solves $\mathbf{y} = \mathbf{A}\,\boldsymbol{\beta} + \boldsymbol{\varepsilon}$
//! by singular value decomposition, discarding singular values below
//! $\max(n, m)\,\varepsilon\,s_{\max}$.  The coefficient covariance is
//! $\hat\sigma^2\,\mathbf{V}\,\boldsymbol{\Sigma}^{-2}\,\mathbf{V}^\top$ with
//! $\hat\sigma^2 = \lVert\mathbf{r}\rVert^2 / (n - m)$, and zero when there
//! are no spare degrees of freedom.

use log::debug;
use mt_core::{fail, Real, Result};
use nalgebra::{DMatrix, DVector};

/// Iteration cap for the singular value decomposition.
const SVD_MAX_ITERATIONS: usize = 10_000;

/// Result of a least-squares fit.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    coefficients: DVector<Real>,
    covariance: DMatrix<Real>,
    residuals: DVector<Real>,
    residual_variance: Real,
    rank: usize,
}

impl LinearRegression {
    /// Fit the straight line $y = b + m x$.
    ///
    /// Coefficients are ordered `[intercept, slope]`.  Fails if the inputs
    /// differ in length, there are fewer than two points, or every `x` is
    /// the same (the slope is undefined).
    pub fn line(x: &[Real], y: &[Real]) -> Result<Self> {
        if x.len() != y.len() {
            fail!("x and y must have the same length ({} vs {})", x.len(), y.len());
        }
        if x.len() < 2 {
            fail!("a line needs at least two points, got {}", x.len());
        }
        if x.iter().all(|&xi| xi == x[0]) {
            fail!("all x values are equal to {}; the slope is undefined", x[0]);
        }

        let a = DMatrix::from_fn(x.len(), 2, |i, j| if j == 0 { 1.0 } else { x[i] });
        let fit = Self::from_design_matrix(&a, y)?;
        if fit.rank < 2 {
            fail!("x values are numerically degenerate; the slope is undefined");
        }
        Ok(fit)
    }

    /// Fit against a pre-built *n × m* design matrix.
    ///
    /// Fails if the matrix holds a NaN or infinite entry, or if the
    /// decomposition does not converge.  Non-finite `y` values propagate
    /// into the coefficients as NaN.
    pub fn from_design_matrix(a: &DMatrix<Real>, y: &[Real]) -> Result<Self> {
        let (n, m) = a.shape();
        if y.len() != n {
            fail!("y has {} entries but the design matrix has {n} rows", y.len());
        }
        if n < m {
            fail!("more coefficients ({m}) than observations ({n})");
        }

        if let Some(bad) = a.iter().find(|v| !v.is_finite()) {
            fail!("design matrix contains a non-finite entry ({bad})");
        }

        let Some(svd) = a.clone().try_svd(true, true, Real::EPSILON, SVD_MAX_ITERATIONS) else {
            fail!("singular value decomposition did not converge");
        };
        let (Some(u), Some(v_t)) = (svd.u.as_ref(), svd.v_t.as_ref()) else {
            fail!("singular value decomposition did not produce U and V")
        };

        let s_max = svd.singular_values.iter().copied().fold(0.0, Real::max);
        let threshold = n.max(m) as Real * Real::EPSILON * s_max;

        let y = DVector::from_column_slice(y);
        let ut_y = u.transpose() * &y;

        // β = V Σ⁻¹ Uᵀ y and (AᵀA)⁻¹ = V Σ⁻² Vᵀ over the retained values.
        let mut coefficients = DVector::<Real>::zeros(m);
        let mut inverse = DMatrix::<Real>::zeros(m, m);
        let mut rank = 0;
        for (k, &s) in svd.singular_values.iter().enumerate() {
            if s <= threshold {
                continue;
            }
            rank += 1;
            let v_k = v_t.row(k).transpose();
            coefficients += &v_k * (ut_y[k] / s);
            inverse += &v_k * v_k.transpose() / (s * s);
        }

        let residuals = &y - a * &coefficients;
        let residual_variance = if n > m {
            residuals.norm_squared() / (n - m) as Real
        } else {
            0.0
        };

        debug!(
            "least-squares fit: {n} observations, {m} coefficients, rank {rank}, \
             residual variance {residual_variance:e}"
        );

        Ok(Self {
            coefficients,
            covariance: inverse * residual_variance,
            residuals,
            residual_variance,
            rank,
        })
    }

    /// Fitted coefficients β.
    pub fn coefficients(&self) -> &DVector<Real> {
        &self.coefficients
    }

    /// Standard errors of the coefficients.
    pub fn standard_errors(&self) -> DVector<Real> {
        self.covariance.diagonal().map(|v| v.max(0.0).sqrt())
    }

    /// Covariance matrix of the coefficients.
    pub fn covariance(&self) -> &DMatrix<Real> {
        &self.covariance
    }

    /// Residuals y − Aβ.
    pub fn residuals(&self) -> &DVector<Real> {
        &self.residuals
    }

    /// Residual variance $\hat\sigma^2$.
    pub fn residual_variance(&self) -> Real {
        self.residual_variance
    }

    /// Number of singular values kept.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Variance of the fitted value at a design row, $\mathbf{a}^\top C\,\mathbf{a}$.
    pub fn prediction_variance(&self, row: &[Real]) -> Result<Real> {
        if row.len() != self.coefficients.len() {
            fail!(
                "design row has {} entries, expected {}",
                row.len(),
                self.coefficients.len()
            );
        }
        let row = DVector::from_column_slice(row);
        Ok((row.transpose() * &self.covariance * &row)[(0, 0)].max(0.0))
    }

    /// R² statistic (coefficient of determination).
    pub fn r_squared(&self, y: &[Real]) -> Real {
        if y.is_empty() {
            return 0.0;
        }
        let mean = y.iter().sum::<Real>() / y.len() as Real;
        let ss_tot: Real = y.iter().map(|&yi| (yi - mean).powi(2)).sum();
        if ss_tot == 0.0 {
            1.0
        } else {
            1.0 - self.residuals.norm_squared() / ss_tot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mt_core::Error;

    #[test]
    fn exact_line() {
        let x: Vec<Real> = (0..20).map(|i| i as Real).collect();
        let y: Vec<Real> = x.iter().map(|&xi| 2.0 + 3.0 * xi).collect();
        let fit = LinearRegression::line(&x, &y).unwrap();
        assert_abs_diff_eq!(fit.coefficients()[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.coefficients()[1], 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.r_squared(&y), 1.0, epsilon = 1e-10);
        assert_eq!(fit.rank(), 2);
    }

    #[test]
    fn textbook_standard_errors() {
        // y ≈ 1 + 2x with alternating residuals ±0.1
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<Real> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 1.0 + 2.0 * xi + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let fit = LinearRegression::line(&x, &y).unwrap();

        let n = x.len() as Real;
        let mean = x.iter().sum::<Real>() / n;
        let sxx: Real = x.iter().map(|xi| (xi - mean).powi(2)).sum();
        let s2 = fit.residuals().norm_squared() / (n - 2.0);
        let se = fit.standard_errors();
        assert_abs_diff_eq!(se[1], (s2 / sxx).sqrt(), epsilon = 1e-12);
        let sum_sq: Real = x.iter().map(|xi| xi * xi).sum();
        assert_abs_diff_eq!(se[0], (s2 * sum_sq / (n * sxx)).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(fit.residual_variance(), s2, epsilon = 1e-15);
    }

    #[test]
    fn quadratic_design_matrix() {
        let x: Vec<Real> = (0..30).map(|i| -5.0 + i as Real * 0.5).collect();
        let y: Vec<Real> = x.iter().map(|&xi| 1.0 - 2.0 * xi + 0.5 * xi * xi).collect();
        let a = DMatrix::from_fn(x.len(), 3, |i, j| x[i].powi(j as i32));
        let fit = LinearRegression::from_design_matrix(&a, &y).unwrap();
        let c = fit.coefficients();
        assert_abs_diff_eq!(c[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(c[1], -2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(c[2], 0.5, epsilon = 1e-8);
    }

    #[test]
    fn two_points_have_no_residual_variance() {
        let fit = LinearRegression::line(&[1.0, 3.0], &[2.0, 6.0]).unwrap();
        assert_eq!(fit.residual_variance(), 0.0);
        assert_eq!(fit.prediction_variance(&[1.0, 10.0]).unwrap(), 0.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(matches!(
            LinearRegression::line(&[1.0], &[2.0]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            LinearRegression::line(&[1.0, 2.0], &[2.0]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            LinearRegression::line(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_finite_x_is_rejected() {
        let y = [0.0, 1.0, 2.0];
        for x in [
            [0.0, Real::NAN, 2.0],
            [0.0, 1.0, Real::INFINITY],
            [Real::NEG_INFINITY, 1.0, 2.0],
        ] {
            assert!(matches!(
                LinearRegression::line(&x, &y),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn non_finite_y_propagates() {
        let fit = LinearRegression::line(&[0.0, 1.0, 2.0], &[0.0, Real::NAN, 2.0]).unwrap();
        assert!(fit.coefficients()[1].is_nan());
    }
}
