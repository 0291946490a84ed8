// src/error.rs
use thiserror::Error;

/// Error types for the bermudan-mc library
#[derive(Debug, Clone, Error)]
pub enum PricingError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration (malformed exercise schedule, bad search bracket, ...)
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// The simulation could not provide a time-indexed quantity
    #[error("Model evaluation failed for {quantity} at t = {time}: {reason}")]
    ModelEvaluation {
        quantity: String,
        time: f64,
        reason: String,
    },

    /// Bounded search did not shrink its bracket within the iteration budget
    #[error(
        "{method} did not converge after {iterations} iterations (bracket width {bracket_width:.3e})"
    )]
    ConvergenceFailure {
        method: String,
        iterations: usize,
        bracket_width: f64,
    },

    /// Numerical instability or degenerate estimation
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// Path vectors sampled on different path sets
    #[error("Dimension mismatch in {context}: expected {expected} paths, found {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    /// Valuation aborted through a cancellation flag
    #[error("Valuation cancelled during {stage}")]
    Cancelled { stage: String },
}

/// Result type alias for bermudan-mc operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value <= 0.0 || value.is_nan() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value < 0.0 || value.is_nan() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> PricingResult<()> {
        if !(min..=max).contains(&value) {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate correlation parameter
    pub fn validate_correlation(name: &str, rho: f64) -> PricingResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 100_000_000 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (100 million)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a sequence of times is non-empty, finite and strictly increasing
    pub fn validate_strictly_increasing(name: &str, values: &[f64]) -> PricingResult<()> {
        if values.is_empty() {
            return Err(PricingError::InvalidConfiguration {
                field: name.to_string(),
                reason: "must contain at least one entry".to_string(),
            });
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(PricingError::InvalidConfiguration {
                field: name.to_string(),
                reason: format!("contains a non-finite entry: {}", bad),
            });
        }
        if let Some(i) = values.windows(2).position(|w| w[1] <= w[0]) {
            return Err(PricingError::InvalidConfiguration {
                field: name.to_string(),
                reason: format!(
                    "must be strictly increasing, but entry {} ({}) follows {}",
                    i + 1,
                    values[i + 1],
                    values[i]
                ),
            });
        }
        Ok(())
    }

    /// Validate that a companion array matches the reference length
    pub fn validate_same_length(
        name: &str,
        reference: &str,
        expected: usize,
        found: usize,
    ) -> PricingResult<()> {
        if expected != found {
            Err(PricingError::InvalidConfiguration {
                field: name.to_string(),
                reason: format!(
                    "has {} entries but {} has {}",
                    found, reference, expected
                ),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_correlation() {
        assert!(validate_correlation("rho", 0.5).is_ok());
        assert!(validate_correlation("rho", 1.0).is_ok());
        assert!(validate_correlation("rho", -1.0).is_ok());
        assert!(validate_correlation("rho", 1.1).is_err());
        assert!(validate_correlation("rho", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_strictly_increasing() {
        assert!(validate_strictly_increasing("dates", &[0.5, 1.0, 2.0]).is_ok());
        assert!(validate_strictly_increasing("dates", &[]).is_err());
        assert!(validate_strictly_increasing("dates", &[1.0, 1.0]).is_err());
        assert!(validate_strictly_increasing("dates", &[2.0, 1.0]).is_err());
        assert!(validate_strictly_increasing("dates", &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_validate_same_length() {
        assert!(validate_same_length("strikes", "exercise_dates", 3, 3).is_ok());
        let err = validate_same_length("strikes", "exercise_dates", 3, 2).unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("strikes"));
    }

    #[test]
    fn test_error_display() {
        let error = PricingError::ModelEvaluation {
            quantity: "numeraire".to_string(),
            time: 3.5,
            reason: "time is not on the simulation grid".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("numeraire"));
        assert!(display.contains("3.5"));
        assert!(display.contains("grid"));
    }

    #[test]
    fn test_convergence_error_display() {
        let error = PricingError::ConvergenceFailure {
            method: "golden-section search".to_string(),
            iterations: 7,
            bracket_width: 0.25,
        };

        let display = format!("{}", error);
        assert!(display.contains("golden-section"));
        assert!(display.contains("7 iterations"));
    }
}
