// src/optimizer/golden_section.rs
//! Bounded one-dimensional golden-section search
//!
//! # Algorithm
//!
//! For a unimodal objective f on [a, b], evaluate the two interior points
//! ```text
//! c = b - (b - a)/φ,   d = a + (b - a)/φ,   φ = (1 + √5)/2
//! ```
//! and discard the outer segment on the side of the larger value. One of
//! the interior points is reused, so each iteration costs a single
//! evaluation and shrinks the bracket by 1/φ ≈ 0.618.
//!
//! When f(c) = f(d) the minimum of a unimodal function lies in [c, d], so
//! both outer segments are discarded. This keeps a flat objective centred
//! in the original bracket instead of drifting to one end.
//!
//! The search is deterministic: the same objective and bracket always
//! produce the same sequence of evaluation points.

use crate::config::DualSearchConfig;
use crate::error::{PricingError, PricingResult};
use tracing::debug;

/// Result of a bounded search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub best_point: f64,
    pub best_value: f64,
    /// Bracket reductions performed
    pub iterations: usize,
    /// Objective evaluations performed
    pub evaluations: usize,
}

struct Tracker<F> {
    objective: F,
    evaluations: usize,
    best_point: f64,
    best_value: f64,
}

impl<F> Tracker<F>
where
    F: FnMut(f64) -> PricingResult<f64>,
{
    fn evaluate(&mut self, x: f64) -> PricingResult<f64> {
        let value = (self.objective)(x)?;
        self.evaluations += 1;
        if !value.is_finite() {
            return Err(PricingError::NumericalInstability {
                method: "golden-section search".to_string(),
                reason: format!("objective is not finite at {}: {}", x, value),
            });
        }
        if value < self.best_value {
            self.best_point = x;
            self.best_value = value;
        }
        Ok(value)
    }
}

/// Minimise `objective` over `[config.lower, config.upper]`
///
/// Iterates until the bracket is no wider than `config.tolerance`, then
/// evaluates the bracket midpoint. Returns the lowest value seen; ties with
/// the midpoint resolve to the midpoint.
///
/// # Errors
///
/// - `InvalidConfiguration` / `InvalidParameters` for a malformed bracket
/// - `ConvergenceFailure` if `config.max_iterations` reductions do not reach the tolerance
/// - any error returned by `objective`, unchanged
pub fn golden_section_search<F>(config: &DualSearchConfig, objective: F) -> PricingResult<SearchOutcome>
where
    F: FnMut(f64) -> PricingResult<f64>,
{
    config.validate()?;
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;

    let mut tracker = Tracker {
        objective,
        evaluations: 0,
        best_point: f64::NAN,
        best_value: f64::INFINITY,
    };

    let (mut a, mut b) = (config.lower, config.upper);
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = tracker.evaluate(c)?;
    let mut fd = tracker.evaluate(d)?;

    let mut iterations = 0;
    while b - a > config.tolerance {
        if iterations >= config.max_iterations {
            return Err(PricingError::ConvergenceFailure {
                method: "golden-section search".to_string(),
                iterations,
                bracket_width: b - a,
            });
        }
        iterations += 1;

        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = tracker.evaluate(c)?;
        } else if fc > fd {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = tracker.evaluate(d)?;
        } else {
            a = c;
            b = d;
            c = b - inv_phi * (b - a);
            d = a + inv_phi * (b - a);
            fc = tracker.evaluate(c)?;
            fd = tracker.evaluate(d)?;
        }

        debug!(iteration = iterations, lower = a, upper = b, "golden-section bracket");
    }

    let midpoint = 0.5 * (a + b);
    let best_before = tracker.best_value;
    let f_mid = tracker.evaluate(midpoint)?;
    if f_mid <= best_before {
        tracker.best_point = midpoint;
        tracker.best_value = f_mid;
    }

    Ok(SearchOutcome {
        best_point: tracker.best_point,
        best_value: tracker.best_value,
        iterations,
        evaluations: tracker.evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_minimum() {
        let cfg = DualSearchConfig::default();
        let outcome = golden_section_search(&cfg, |x| Ok((x - 0.3) * (x - 0.3) + 1.0)).unwrap();

        assert_abs_diff_eq!(outcome.best_point, 0.3, epsilon = 1e-4);
        assert_abs_diff_eq!(outcome.best_value, 1.0, epsilon = 1e-8);
        assert!(outcome.iterations > 0);
        assert_eq!(outcome.evaluations, outcome.iterations + 3);
    }

    #[test]
    fn test_flat_objective_stays_centred() {
        let cfg = DualSearchConfig::default();
        let outcome = golden_section_search(&cfg, |_| Ok(4.2)).unwrap();

        assert_abs_diff_eq!(outcome.best_point, 0.0, epsilon = 1e-4);
        assert_eq!(outcome.best_value, 4.2);
    }

    #[test]
    fn test_monotone_objective_hits_boundary() {
        let cfg = DualSearchConfig::default();
        let outcome = golden_section_search(&cfg, |x| Ok(x)).unwrap();
        assert_abs_diff_eq!(outcome.best_point, -1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_is_deterministic() {
        let cfg = DualSearchConfig::default();
        let f = |x: f64| -> PricingResult<f64> { Ok((x + 0.42).abs()) };
        let first = golden_section_search(&cfg, f).unwrap();
        let second = golden_section_search(&cfg, f).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let cfg = DualSearchConfig {
            tolerance: 1e-12,
            max_iterations: 5,
            ..Default::default()
        };
        let result = golden_section_search(&cfg, |x| Ok(x * x));
        assert!(matches!(
            result,
            Err(PricingError::ConvergenceFailure { iterations: 5, .. })
        ));
    }

    #[test]
    fn test_objective_error_propagates() {
        let cfg = DualSearchConfig::default();
        let mut calls = 0;
        let result = golden_section_search(&cfg, |_| {
            calls += 1;
            if calls > 3 {
                Err(PricingError::ModelEvaluation {
                    quantity: "asset value".to_string(),
                    time: 1.0,
                    reason: "missing".to_string(),
                })
            } else {
                Ok(1.0)
            }
        });
        assert!(matches!(result, Err(PricingError::ModelEvaluation { .. })));
    }

    #[test]
    fn test_non_finite_objective_is_rejected() {
        let cfg = DualSearchConfig::default();
        let result = golden_section_search(&cfg, |_| Ok(f64::NAN));
        assert!(matches!(result, Err(PricingError::NumericalInstability { .. })));
    }
}
