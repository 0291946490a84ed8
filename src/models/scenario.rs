// src/models/scenario.rs
//! Simulation built from explicitly given path values
//!
//! Useful for deterministic scenarios, externally generated paths and
//! unit tests: asset values are supplied as a `times × paths` matrix and
//! the numeraire as one deterministic value per grid time.

use super::model::{check_single_asset, AssetModelSimulation, SimulatedPaths, TimeGrid};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::random_variable::PathVector;
use ndarray::Array2;

pub struct ScenarioSimulation {
    paths: SimulatedPaths,
    numeraire: Vec<f64>,
}

impl ScenarioSimulation {
    /// `asset_values[(t, p)]` is the asset on path `p` at `times[t]`; numeraire is 1
    pub fn new(times: Vec<f64>, asset_values: Array2<f64>) -> PricingResult<Self> {
        let numeraire = vec![1.0; times.len()];
        Self::with_numeraire(times, asset_values, numeraire)
    }

    pub fn with_numeraire(
        times: Vec<f64>,
        asset_values: Array2<f64>,
        numeraire: Vec<f64>,
    ) -> PricingResult<Self> {
        validate_same_length("numeraire", "times", times.len(), numeraire.len())?;
        for &n in &numeraire {
            validate_positive("numeraire", n)?;
            validate_finite("numeraire", n)?;
        }
        let grid = TimeGrid::new(times)?;
        let paths = SimulatedPaths::new(grid, asset_values)?;
        Ok(ScenarioSimulation { paths, numeraire })
    }

    /// Every path follows the same asset levels
    pub fn deterministic(times: Vec<f64>, asset_levels: &[f64], paths: usize) -> PricingResult<Self> {
        if asset_levels.len() != times.len() {
            return Err(PricingError::InvalidConfiguration {
                field: "asset_levels".to_string(),
                reason: format!(
                    "has {} entries but times has {}",
                    asset_levels.len(),
                    times.len()
                ),
            });
        }
        let values = Array2::from_shape_fn((times.len(), paths), |(t, _)| asset_levels[t]);
        Self::new(times, values)
    }
}

impl AssetModelSimulation for ScenarioSimulation {
    fn number_of_paths(&self) -> usize {
        self.paths.number_of_paths()
    }

    fn time_grid(&self) -> &TimeGrid {
        self.paths.grid()
    }

    fn asset_value(&self, time: f64, asset_index: usize) -> PricingResult<PathVector> {
        check_single_asset(time, asset_index)?;
        self.paths.value_at(time, "asset value")
    }

    fn numeraire(&self, time: f64) -> PricingResult<PathVector> {
        let index = self.time_grid().index_of(time, "numeraire")?;
        Ok(self.constant(time, self.numeraire[index]))
    }
}
