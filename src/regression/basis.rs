// src/regression/basis.rs
//! Regression basis functions
//!
//! The continuation value at an exercise date is approximated as a linear
//! combination of functions of the underlying observed at that date. The
//! basis is rebuilt from scratch at every date and carries no valuation
//! time of its own: it only serves as a set of regressors.

use crate::config::{BasisStrategy, RegressionConfig};
use crate::error::{PricingError, PricingResult};
use crate::random_variable::PathVector;

/// Build the basis for `underlying` according to `config`
pub fn basis_functions(
    underlying: &PathVector,
    config: &RegressionConfig,
) -> PricingResult<Vec<PathVector>> {
    match config.strategy {
        BasisStrategy::Monomials => monomials(underlying, config.order),
        BasisStrategy::CenteredMonomials => centered_monomials(underlying, config.order),
        BasisStrategy::Binning { bins } => Ok(binned_indicators(underlying, bins)),
    }
}

/// `[x⁰, x¹, …, x^order]`
///
/// # Errors
///
/// `InvalidConfiguration` if `order` does not fit an `i32` exponent.
pub fn monomials(underlying: &PathVector, order: usize) -> PricingResult<Vec<PathVector>> {
    let max_power = i32::try_from(order).map_err(|_| PricingError::InvalidConfiguration {
        field: "order".to_string(),
        reason: format!("regression order {} exceeds the largest exponent", order),
    })?;
    let x = underlying.clone().with_time(0.0);
    Ok((0..=max_power).map(|power| x.pow(power)).collect())
}

/// Monomials of the underlying shifted to zero sample mean
///
/// Only the shape of the underlying enters the regression; the fitted
/// values span the same space as [`monomials`] but with a far better
/// conditioned design matrix for high spot levels.
pub fn centered_monomials(underlying: &PathVector, order: usize) -> PricingResult<Vec<PathVector>> {
    let centered = underlying - underlying.average();
    monomials(&centered, order)
}

/// Indicators `1{x ≥ q_i}` on the empirical `i / bins` quantiles
pub fn binned_indicators(underlying: &PathVector, bins: usize) -> Vec<PathVector> {
    let mut sorted = underlying.to_vec();
    if sorted.is_empty() || bins == 0 {
        return Vec::new();
    }
    sorted.sort_by(f64::total_cmp);

    let x = underlying.clone().with_time(0.0);
    let n = sorted.len();
    (0..bins)
        .map(|i| {
            let bin_left = sorted[(i * n) / bins];
            let indicator = x
                .realizations()
                .iter()
                .map(|&v| if v - bin_left >= 0.0 { 1.0 } else { 0.0 })
                .collect();
            PathVector::from_vec(0.0, indicator)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monomials_default_order() {
        let s = PathVector::from_vec(2.0, vec![1.0, 2.0, 3.0]);
        let basis = basis_functions(&s, &RegressionConfig::default()).unwrap();

        assert_eq!(basis.len(), 5);
        assert_eq!(basis[0].to_vec(), vec![1.0, 1.0, 1.0]);
        assert_eq!(basis[1].to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(basis[4].to_vec(), vec![1.0, 16.0, 81.0]);
        assert!(basis.iter().all(|b| b.time() == 0.0));
    }

    #[test]
    fn test_order_zero_is_constant_only() {
        let s = PathVector::from_vec(1.0, vec![90.0, 110.0]);
        let basis = monomials(&s, 0).unwrap();
        assert_eq!(basis.len(), 1);
        assert!(basis[0].is_deterministic());
    }

    #[test]
    fn test_order_beyond_exponent_range_is_rejected() {
        let s = PathVector::from_vec(1.0, vec![90.0, 110.0]);
        let order = i32::MAX as usize + 1;
        assert!(matches!(
            monomials(&s, order),
            Err(PricingError::InvalidConfiguration { .. })
        ));
        let cfg = RegressionConfig {
            order,
            strategy: BasisStrategy::CenteredMonomials,
            ..Default::default()
        };
        assert!(basis_functions(&s, &cfg).is_err());
    }

    #[test]
    fn test_centered_monomials_have_zero_mean_first_power() {
        let s = PathVector::from_vec(1.0, vec![90.0, 100.0, 110.0, 120.0]);
        let basis = centered_monomials(&s, 3).unwrap();
        assert_eq!(basis.len(), 4);
        assert_relative_eq!(basis[1].average(), 0.0, epsilon = 1e-12);
        assert_eq!(basis[1].to_vec(), vec![-15.0, -5.0, 5.0, 15.0]);
    }

    #[test]
    fn test_binned_indicators() {
        let s = PathVector::from_vec(1.0, vec![4.0, 1.0, 3.0, 2.0]);
        let basis = binned_indicators(&s, 2);
        assert_eq!(basis.len(), 2);
        // First bin starts at the minimum: all paths are in it
        assert_eq!(basis[0].to_vec(), vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(basis[1].to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_binning_strategy_dispatch() {
        let s = PathVector::from_vec(1.0, (0..100).map(|i| i as f64).collect());
        let cfg = RegressionConfig {
            strategy: BasisStrategy::Binning { bins: 20 },
            ..Default::default()
        };
        let basis = basis_functions(&s, &cfg).unwrap();
        assert_eq!(basis.len(), cfg.basis_size());
        assert_relative_eq!(basis[10].average(), 0.5);
    }
}
