//! Products valued against an [`AssetModelSimulation`]
//!
//! Every product is an independent type implementing the small
//! [`AssetMonteCarloProduct`] capability; there is no product hierarchy.

pub mod bermudan;
pub mod european;
pub mod schedule;

pub use bermudan::{BermudanOption, BermudanValuation, ExerciseMethod, ExerciseStrategy, Valuation};
pub use european::EuropeanOption;
pub use schedule::ExerciseSchedule;

use crate::error::PricingResult;
use crate::models::AssetModelSimulation;
use crate::random_variable::PathVector;

pub trait AssetMonteCarloProduct {
    /// Pathwise value at `evaluation_time`, expressed in currency of that time
    fn value(&self, evaluation_time: f64, model: &dyn AssetModelSimulation)
        -> PricingResult<PathVector>;

    /// Monte Carlo price: the sample mean of [`value`](Self::value)
    fn average_value(
        &self,
        evaluation_time: f64,
        model: &dyn AssetModelSimulation,
    ) -> PricingResult<f64> {
        Ok(self.value(evaluation_time, model)?.average())
    }
}
