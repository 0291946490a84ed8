//! # bermudan-mc: Monte Carlo Bounds for Bermudan Options
//!
//! Prices Bermudan (discretely exercisable) options on Monte Carlo paths by
//! backward induction over the exercise dates, and brackets the price from
//! both sides.
//!
//! ## Key Features
//!
//! - **Lower bound**: Longstaff-Schwartz style regression of the continuation value
//! - **Upper bound**: martingale-corrected dual value, scale calibrated by golden-section search
//! - **Regression bases**: monomials, centred monomials, quantile bins, intrinsic-value regressor
//! - **Path simulations**: Black-Scholes, Heston (Euler, QE, Alfonsi), explicit scenarios
//! - **Parallel**: rayon for path generation and per-path vector operations
//!
//! ## Quick Start
//!
//! ```rust
//! use bermudan_mc::models::{BlackScholesConfig, BlackScholesSimulation};
//! use bermudan_mc::products::{BermudanOption, ExerciseMethod};
//!
//! let model = BlackScholesSimulation::new(BlackScholesConfig {
//!     paths: 2_000,
//!     times: vec![0.5, 1.0, 1.5, 2.0],
//!     ..Default::default()
//! })
//! .expect("Valid configuration");
//!
//! let dates = vec![0.5, 1.0, 1.5, 2.0];
//! let lower = BermudanOption::new(dates.clone(), vec![1.0; 4], vec![100.0; 4],
//!     ExerciseMethod::EstimateConditionalExpectation).expect("Valid schedule");
//! let upper = BermudanOption::new(dates, vec![1.0; 4], vec![100.0; 4],
//!     ExerciseMethod::UpperBoundMethod).expect("Valid schedule");
//!
//! let primal = lower.valuation(0.0, &model).expect("Valuation");
//! let dual = upper.valuation(0.0, &model).expect("Valuation");
//! println!("price in [{:.4}, {:.4}], lambda = {:?}", primal.average(), dual.average(), dual.lambda);
//! ```
//!
//! ## Mathematical Foundation
//!
//! All values inside the recursion are numeraire relative and weighted by the
//! Monte Carlo path probabilities, so payoffs at different dates compare
//! directly. The result is rebased to the evaluation time at the end.

// Module declarations
pub mod analytics;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod math_utils;
pub mod models;
pub mod optimizer;
pub mod output;
pub mod products;
pub mod random_variable;
pub mod regression;
pub mod rng;

// Re-export commonly used types for convenience
pub use config::{BasisStrategy, CancellationFlag, DualSearchConfig, RegressionConfig};
pub use error::{PricingError, PricingResult};
pub use models::AssetModelSimulation;
pub use products::{AssetMonteCarloProduct, BermudanOption, ExerciseMethod, ExerciseStrategy};
pub use random_variable::PathVector;
