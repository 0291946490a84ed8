// src/regression/estimator.rs
//! Conditional expectation by least-squares regression
//!
//! # Mathematical Framework
//!
//! Given basis functions φ₀, …, φₖ₋₁ sampled on n paths and a target Y,
//! the estimator solves the ordinary least-squares problem
//! ```text
//! β* = argmin_β Σ_p (Y_p - Σ_j β_j φ_j(p))²
//! ```
//! and returns the fitted values `E[Y | φ](p) = Σ_j β*_j φ_j(p)` per path.
//!
//! # Numerical Treatment
//!
//! Powers of the underlying span many orders of magnitude (S⁴ ≈ 10⁸ for
//! S ≈ 100), so each design column is scaled by its largest absolute value
//! before factorisation. The fitted values do not depend on that scaling.
//! The solve uses a thin SVD with singular values below `1e-12 · σ_max`
//! truncated, which yields the minimum-norm projection for collinear or
//! constant bases (deterministic models) instead of failing.

use crate::error::{PricingError, PricingResult};
use crate::random_variable::PathVector;
use nalgebra::{DMatrix, DVector, Dynamic, SVD};
use tracing::debug;

const RELATIVE_SINGULAR_CUTOFF: f64 = 1e-12;

/// Least-squares regression on a fixed set of basis functions
pub struct ConditionalExpectationRegression {
    design: DMatrix<f64>,
    column_scales: Vec<f64>,
    svd: SVD<f64, Dynamic, Dynamic>,
    cutoff: f64,
}

impl ConditionalExpectationRegression {
    pub fn new(basis: &[PathVector]) -> PricingResult<Self> {
        let first = basis.first().ok_or_else(|| PricingError::InvalidConfiguration {
            field: "basis".to_string(),
            reason: "at least one basis function is required".to_string(),
        })?;
        let paths = first.len();
        if paths == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "basis".to_string(),
                reason: "basis functions have no realizations".to_string(),
            });
        }
        if let Some(bad) = basis.iter().find(|b| b.len() != paths) {
            return Err(PricingError::DimensionMismatch {
                context: "regression basis".to_string(),
                expected: paths,
                found: bad.len(),
            });
        }

        let column_scales: Vec<f64> = basis
            .iter()
            .map(|b| {
                let scale = b.abs().max();
                if scale > 0.0 && scale.is_finite() {
                    scale
                } else {
                    1.0
                }
            })
            .collect();

        let design = DMatrix::from_fn(paths, basis.len(), |row, col| {
            basis[col].realizations()[row] / column_scales[col]
        });
        if design.iter().any(|v| !v.is_finite()) {
            return Err(PricingError::NumericalInstability {
                method: "conditional expectation regression".to_string(),
                reason: "basis functions contain non-finite values".to_string(),
            });
        }

        let svd = design.clone().svd(true, true);
        let cutoff = svd.singular_values.max() * RELATIVE_SINGULAR_CUTOFF;
        let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();
        if rank < basis.len() {
            debug!(
                rank,
                basis_size = basis.len(),
                "rank-deficient regression basis, using pseudo-inverse"
            );
        }

        Ok(ConditionalExpectationRegression {
            design,
            column_scales,
            svd,
            cutoff,
        })
    }

    pub fn number_of_paths(&self) -> usize {
        self.design.nrows()
    }

    pub fn basis_size(&self) -> usize {
        self.design.ncols()
    }

    fn solve_scaled(&self, target: &PathVector) -> PricingResult<DVector<f64>> {
        if target.len() != self.number_of_paths() {
            return Err(PricingError::DimensionMismatch {
                context: "regression target".to_string(),
                expected: self.number_of_paths(),
                found: target.len(),
            });
        }
        let y = DVector::from_iterator(target.len(), target.realizations().iter().copied());
        self.svd
            .solve(&y, self.cutoff)
            .map_err(|reason| PricingError::NumericalInstability {
                method: "conditional expectation regression".to_string(),
                reason: reason.to_string(),
            })
    }

    /// Regression coefficients in the units of the original basis functions
    pub fn coefficients(&self, target: &PathVector) -> PricingResult<Vec<f64>> {
        let beta = self.solve_scaled(target)?;
        Ok(beta
            .iter()
            .zip(&self.column_scales)
            .map(|(b, scale)| b / scale)
            .collect())
    }

    /// Fitted value of `target` on every path
    ///
    /// A deterministic target is returned unchanged: its conditional
    /// expectation is the constant itself, not a least-squares approximation.
    pub fn estimate(&self, target: &PathVector) -> PricingResult<PathVector> {
        if target.is_deterministic() && target.len() == self.number_of_paths() {
            return Ok(target.clone());
        }
        let beta = self.solve_scaled(target)?;
        let fitted = &self.design * beta;
        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(PricingError::NumericalInstability {
                method: "conditional expectation regression".to_string(),
                reason: "fitted values are not finite".to_string(),
            });
        }
        Ok(PathVector::from_vec(
            target.time(),
            fitted.iter().copied().collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::basis::monomials;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_fit_of_quadratic() {
        let x = PathVector::from_vec(1.0, (0..50).map(|i| 80.0 + i as f64).collect());
        let target = PathVector::from_vec(
            2.0,
            x.realizations().iter().map(|&s| 3.0 - 0.5 * s + 0.01 * s * s).collect(),
        );

        let fitted = target.conditional_expectation(&monomials(&x, 2).unwrap()).unwrap();
        for (f, t) in fitted.realizations().iter().zip(target.realizations().iter()) {
            assert_relative_eq!(*f, *t, max_relative = 1e-8);
        }
        assert_eq!(fitted.time(), 2.0);

        let coefficients = ConditionalExpectationRegression::new(&monomials(&x, 2).unwrap())
            .unwrap()
            .coefficients(&target)
            .unwrap();
        assert_relative_eq!(coefficients[0], 3.0, max_relative = 1e-6);
        assert_relative_eq!(coefficients[1], -0.5, max_relative = 1e-6);
        assert_relative_eq!(coefficients[2], 0.01, max_relative = 1e-6);
    }

    #[test]
    fn test_constant_basis_returns_sample_mean() {
        let x = PathVector::from_vec(1.0, vec![90.0, 100.0, 110.0, 120.0]);
        let target = PathVector::from_vec(2.0, vec![1.0, 2.0, 3.0, 6.0]);

        let fitted = target.conditional_expectation(&monomials(&x, 0).unwrap()).unwrap();
        assert!(fitted.is_deterministic());
        assert_relative_eq!(fitted.average(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collinear_basis_is_projected() {
        // Deterministic underlying: every power is a multiple of the constant
        let x = PathVector::constant(1.0, 110.0, 8);
        let target = PathVector::constant(2.0, 2.5, 8);

        let fitted = target.conditional_expectation(&monomials(&x, 4).unwrap()).unwrap();
        for f in fitted.realizations().iter() {
            assert_relative_eq!(*f, 2.5, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_constant_target_is_returned_exactly() {
        // ties between continuation and exercise must not depend on SVD rounding
        let x = PathVector::constant(1.0, 110.0, 4);
        let target = PathVector::constant(2.0, 10.0 / 3.0, 4);
        for order in 0..=6 {
            let fitted = target
                .conditional_expectation(&monomials(&x, order).unwrap())
                .unwrap();
            assert_eq!(fitted, target);
        }
    }

    #[test]
    fn test_zero_target_fits_to_zero() {
        let x = PathVector::from_vec(1.0, vec![95.0, 100.0, 105.0]);
        let target = PathVector::constant(1.0, 0.0, 3);
        let fitted = target.conditional_expectation(&monomials(&x, 4).unwrap()).unwrap();
        assert!(fitted.realizations().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_empty_and_mismatched_basis() {
        assert!(ConditionalExpectationRegression::new(&[]).is_err());

        let basis = vec![
            PathVector::constant(0.0, 1.0, 3),
            PathVector::constant(0.0, 1.0, 4),
        ];
        assert!(matches!(
            ConditionalExpectationRegression::new(&basis),
            Err(PricingError::DimensionMismatch { .. })
        ));

        let regression = ConditionalExpectationRegression::new(&basis[..1]).unwrap();
        assert!(regression.estimate(&PathVector::constant(0.0, 1.0, 5)).is_err());
    }
}
