// src/config.rs
//! Valuation configuration
//!
//! Plain configuration structs with sensible defaults and explicit
//! validation, plus the cooperative cancellation flag checked between
//! exercise dates and between calibration iterations.

use crate::error::{validation::*, PricingError, PricingResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How regression features are derived from the underlying at an exercise date
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasisStrategy {
    /// `1, x, x², …, x^order`
    Monomials,
    /// Powers of the underlying re-centred to zero mean
    CenteredMonomials,
    /// Indicator functions `x ≥ q_i` on `bins` empirical quantiles
    Binning { bins: usize },
}

/// Regression settings for the conditional expectation estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionConfig {
    /// Highest monomial power (ignored for binning)
    pub order: usize,
    pub strategy: BasisStrategy,
    /// Regress on the floored intrinsic value `max(S - K, 0)` instead of `S`
    pub intrinsic_value_as_basis: bool,
}

impl RegressionConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if self.order > 12 {
            return Err(PricingError::InvalidConfiguration {
                field: "order".to_string(),
                reason: format!("regression order {} is numerically meaningless (max 12)", self.order),
            });
        }
        if let BasisStrategy::Binning { bins } = self.strategy {
            if bins == 0 {
                return Err(PricingError::InvalidConfiguration {
                    field: "bins".to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of basis functions this configuration produces
    pub fn basis_size(&self) -> usize {
        match self.strategy {
            BasisStrategy::Monomials | BasisStrategy::CenteredMonomials => self.order + 1,
            BasisStrategy::Binning { bins } => bins,
        }
    }
}

impl Default for RegressionConfig {
    fn default() -> Self {
        RegressionConfig {
            order: 4,
            strategy: BasisStrategy::Monomials,
            intrinsic_value_as_basis: false,
        }
    }
}

/// Bracket and stopping rule for the dual-bound λ search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualSearchConfig {
    pub lower: f64,
    pub upper: f64,
    /// Stop once the bracket is no wider than this
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl DualSearchConfig {
    pub fn validate(&self) -> PricingResult<()> {
        validate_finite("lower", self.lower)?;
        validate_finite("upper", self.upper)?;
        validate_positive("tolerance", self.tolerance)?;
        if self.upper <= self.lower {
            return Err(PricingError::InvalidConfiguration {
                field: "bracket".to_string(),
                reason: format!("upper ({}) must exceed lower ({})", self.upper, self.lower),
            });
        }
        if self.max_iterations == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for DualSearchConfig {
    fn default() -> Self {
        DualSearchConfig {
            lower: -1.0,
            upper: 1.0,
            tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

/// Shared flag used to abort a running valuation
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `Cancelled` if the flag has been raised
    pub fn checkpoint(&self, stage: &str) -> PricingResult<()> {
        if self.is_cancelled() {
            Err(PricingError::Cancelled {
                stage: stage.to_string(),
            })
        } else {
            Ok(())
        }
    }
}
