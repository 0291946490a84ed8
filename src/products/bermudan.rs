// src/products/bermudan.rs
//! Bermudan option valued by backward induction over its exercise dates
//!
//! # Recursion
//!
//! Starting from `value = 0` (never exercised) the dates are visited from
//! last to first. At date `t_i` the payoff of exercising,
//! ```text
//! P_i = N_i (S(t_i) - K_i) / numeraire(t_i) * weight(t_i)
//! ```
//! is compared with a continuation criterion and the pathwise value is
//! replaced by `P_i` wherever the trigger is negative:
//!
//! - **Regression (lower bound)**: `trigger = E[value | basis(S(t_i))] - P_i`.
//!   Only the decision uses the regression; the value carried forward is
//!   always the realised one.
//! - **Dual (upper bound)**: with the zero mean martingale increment
//!   `M_i = λ (S/N - E[S/N])` at `t_i`, `trigger = value - (P_i - M_i)`,
//!   and `M` is subtracted from the initial value on the last date.
//!
//! A zero trigger continues. The dual bound minimises the average value
//! over λ ∈ [-1, 1] by golden-section search and then revalues once at the
//! best λ.

use super::{AssetMonteCarloProduct, ExerciseSchedule};
use crate::config::{CancellationFlag, DualSearchConfig, RegressionConfig};
use crate::error::PricingResult;
use crate::math_utils::Timer;
use crate::models::AssetModelSimulation;
use crate::optimizer::{golden_section_search, SearchOutcome};
use crate::random_variable::PathVector;
use crate::regression::{basis_functions, ConditionalExpectationRegression};
use tracing::{debug, info};

/// How the exercise boundary is determined; fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseMethod {
    /// Regression estimate of the continuation value (primal)
    EstimateConditionalExpectation,
    /// Martingale corrected pathwise maximum (dual)
    UpperBoundMethod,
}

/// Exercise rule for a single engine run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseStrategy {
    Regression,
    Dual { lambda: f64 },
}

/// Output of one backward induction run
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    /// Pathwise value at the evaluation time
    pub value: PathVector,
    /// Pathwise exercise date, `last date + 1` where never exercised
    pub exercise_time: PathVector,
}

/// Output of [`BermudanOption::valuation`]
#[derive(Debug, Clone, PartialEq)]
pub struct BermudanValuation {
    pub value: PathVector,
    pub exercise_time: PathVector,
    /// Calibrated martingale scale, dual method only
    pub lambda: Option<f64>,
    pub search: Option<SearchOutcome>,
}

impl BermudanValuation {
    pub fn average(&self) -> f64 {
        self.value.average()
    }
}

#[derive(Debug, Clone)]
pub struct BermudanOption {
    schedule: ExerciseSchedule,
    exercise_method: ExerciseMethod,
    regression: RegressionConfig,
    search: DualSearchConfig,
    cancellation: Option<CancellationFlag>,
}

impl BermudanOption {
    /// # Errors
    ///
    /// `InvalidConfiguration` for a malformed schedule, see
    /// [`ExerciseSchedule::new`].
    pub fn new(
        exercise_dates: Vec<f64>,
        notionals: Vec<f64>,
        strikes: Vec<f64>,
        exercise_method: ExerciseMethod,
    ) -> PricingResult<Self> {
        let schedule = ExerciseSchedule::new(exercise_dates, notionals, strikes)?;
        Ok(Self::from_schedule(schedule, exercise_method))
    }

    /// Regression (primal) method
    pub fn with_conditional_expectation(
        exercise_dates: Vec<f64>,
        notionals: Vec<f64>,
        strikes: Vec<f64>,
    ) -> PricingResult<Self> {
        Self::new(
            exercise_dates,
            notionals,
            strikes,
            ExerciseMethod::EstimateConditionalExpectation,
        )
    }

    pub fn from_schedule(schedule: ExerciseSchedule, exercise_method: ExerciseMethod) -> Self {
        BermudanOption {
            schedule,
            exercise_method,
            regression: RegressionConfig::default(),
            search: DualSearchConfig::default(),
            cancellation: None,
        }
    }

    pub fn with_regression(mut self, regression: RegressionConfig) -> PricingResult<Self> {
        regression.validate()?;
        self.regression = regression;
        Ok(self)
    }

    pub fn with_search(mut self, search: DualSearchConfig) -> PricingResult<Self> {
        search.validate()?;
        self.search = search;
        Ok(self)
    }

    /// Checked between exercise dates and between calibration iterations
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn schedule(&self) -> &ExerciseSchedule {
        &self.schedule
    }

    pub fn exercise_dates(&self) -> &[f64] {
        self.schedule.dates()
    }

    pub fn notionals(&self) -> &[f64] {
        self.schedule.notionals()
    }

    pub fn strikes(&self) -> &[f64] {
        self.schedule.strikes()
    }

    pub fn exercise_method(&self) -> ExerciseMethod {
        self.exercise_method
    }

    pub fn regression(&self) -> &RegressionConfig {
        &self.regression
    }

    pub fn search(&self) -> &DualSearchConfig {
        &self.search
    }

    /// Regressors at one exercise date, built from `S` or from `(S - K)⁺`
    fn regression_basis(
        &self,
        underlying: &PathVector,
        strike: f64,
    ) -> PricingResult<Vec<PathVector>> {
        if self.regression.intrinsic_value_as_basis {
            basis_functions(&(underlying - strike).floor(0.0), &self.regression)
        } else {
            basis_functions(underlying, &self.regression)
        }
    }

    fn checkpoint(&self, stage: &str) -> PricingResult<()> {
        match &self.cancellation {
            Some(flag) => flag.checkpoint(stage),
            None => Ok(()),
        }
    }

    /// Value with the configured method, reporting exercise times and the
    /// calibrated λ
    pub fn valuation(
        &self,
        evaluation_time: f64,
        model: &dyn AssetModelSimulation,
    ) -> PricingResult<BermudanValuation> {
        let timer = Timer::new();

        let result = match self.exercise_method {
            ExerciseMethod::EstimateConditionalExpectation => {
                let Valuation {
                    value,
                    exercise_time,
                } = self.evaluate(evaluation_time, model, ExerciseStrategy::Regression)?;
                BermudanValuation {
                    value,
                    exercise_time,
                    lambda: None,
                    search: None,
                }
            }
            ExerciseMethod::UpperBoundMethod => {
                let outcome = golden_section_search(&self.search, |lambda| {
                    self.checkpoint("dual calibration")?;
                    let run = self.evaluate(evaluation_time, model, ExerciseStrategy::Dual { lambda })?;
                    Ok(run.value.average())
                })?;
                let Valuation {
                    value,
                    exercise_time,
                } = self.evaluate(
                    evaluation_time,
                    model,
                    ExerciseStrategy::Dual {
                        lambda: outcome.best_point,
                    },
                )?;
                BermudanValuation {
                    value,
                    exercise_time,
                    lambda: Some(outcome.best_point),
                    search: Some(outcome),
                }
            }
        };

        info!(
            method = ?self.exercise_method,
            lambda = ?result.lambda,
            value = result.average(),
            elapsed_ms = timer.elapsed_ms(),
            "Bermudan valuation finished"
        );
        Ok(result)
    }

    /// One backward induction pass with an explicit exercise rule
    ///
    /// Each call is independent: nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Any model quantity missing at an exercise date or at
    /// `evaluation_time` aborts the pass with that error.
    pub fn evaluate(
        &self,
        evaluation_time: f64,
        model: &dyn AssetModelSimulation,
        strategy: ExerciseStrategy,
    ) -> PricingResult<Valuation> {
        let last_index = self.schedule.len() - 1;

        let mut value = model.constant(evaluation_time, 0.0);
        let mut exercise_time =
            model.constant(evaluation_time, self.schedule.never_exercised_marker());

        for (index, (date, notional, strike)) in self.schedule.iter().enumerate().rev() {
            self.checkpoint("backward induction")?;

            let underlying = model.asset_value(date, 0)?;
            let numeraire = model.numeraire(date)?;
            let weights = model.monte_carlo_weights(date)?;

            let exercise_value =
                (&(&underlying - strike) * notional).div(&numeraire)?.mul(&weights)?;

            let (trigger, exercised) = match strategy {
                ExerciseStrategy::Regression => {
                    let basis = self.regression_basis(&underlying, strike)?;
                    let estimator = ConditionalExpectationRegression::new(&basis)?;
                    let continuation = estimator.estimate(&value)?;
                    (continuation.sub(&exercise_value)?, exercise_value)
                }
                ExerciseStrategy::Dual { lambda } => {
                    let relative = underlying.div(&numeraire)?;
                    let martingale = &(&relative - relative.average()) * lambda;
                    if index == last_index {
                        value = value.sub(&martingale)?;
                    }
                    let exercised = exercise_value.sub(&martingale)?;
                    (value.sub(&exercised)?, exercised)
                }
            };

            value = PathVector::select(&trigger, &value, &exercised)?;
            exercise_time =
                PathVector::select(&trigger, &exercise_time, &model.constant(date, date))?;

            debug!(
                index,
                date,
                exercised = trigger.realizations().iter().filter(|&&t| t < 0.0).count(),
                "exercise date processed"
            );
        }

        let numeraire_at_evaluation = model.numeraire(evaluation_time)?;
        let weights_at_evaluation = model.monte_carlo_weights(evaluation_time)?;
        let value = value
            .mul(&numeraire_at_evaluation)?
            .div(&weights_at_evaluation)?
            .with_time(evaluation_time);

        Ok(Valuation {
            value,
            exercise_time,
        })
    }
}

impl AssetMonteCarloProduct for BermudanOption {
    fn value(
        &self,
        evaluation_time: f64,
        model: &dyn AssetModelSimulation,
    ) -> PricingResult<PathVector> {
        Ok(self.valuation(evaluation_time, model)?.value)
    }
}
