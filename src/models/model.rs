// src/models/model.rs
use crate::error::{validation::*, PricingError, PricingResult};
use crate::random_variable::PathVector;
use ndarray::Array2;

/// Monte Carlo simulation of a single asset as seen by products
///
/// Every vector returned for one simulation has `number_of_paths()`
/// realizations, indexed consistently by path. Values are only available
/// on the simulation's time grid; any other time is a `ModelEvaluation`
/// error.
pub trait AssetModelSimulation: Sync {
    fn number_of_paths(&self) -> usize;

    fn time_grid(&self) -> &TimeGrid;

    /// Broadcast a scalar to the path set
    fn constant(&self, time: f64, value: f64) -> PathVector {
        PathVector::constant(time, value, self.number_of_paths())
    }

    fn asset_value(&self, time: f64, asset_index: usize) -> PricingResult<PathVector>;

    fn numeraire(&self, time: f64) -> PricingResult<PathVector>;

    /// Probability weight of each path; uniform `1/n` for plain Monte Carlo
    fn monte_carlo_weights(&self, time: f64) -> PricingResult<PathVector> {
        self.time_grid().index_of(time, "monte carlo weights")?;
        let n = self.number_of_paths();
        Ok(PathVector::constant(time, 1.0 / n as f64, n))
    }
}

/// Simulation times, strictly increasing
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    const TOLERANCE: f64 = 1e-10;

    pub fn new(times: Vec<f64>) -> PricingResult<Self> {
        validate_strictly_increasing("time_grid", &times)?;
        Ok(TimeGrid { times })
    }

    /// Grid starting at 0 that contains all of `times`
    pub fn from_observation_times(times: &[f64]) -> PricingResult<Self> {
        validate_strictly_increasing("observation_times", times)?;
        if times[0] < 0.0 {
            return Err(PricingError::InvalidConfiguration {
                field: "observation_times".to_string(),
                reason: format!("must not be negative, first entry is {}", times[0]),
            });
        }
        let mut grid = Vec::with_capacity(times.len() + 1);
        if times[0] > Self::TOLERANCE {
            grid.push(0.0);
        }
        grid.extend_from_slice(times);
        Self::new(grid)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Index of `time` on the grid, `quantity` names the failed lookup
    pub fn index_of(&self, time: f64, quantity: &str) -> PricingResult<usize> {
        self.times
            .iter()
            .position(|t| (t - time).abs() <= Self::TOLERANCE)
            .ok_or_else(|| PricingError::ModelEvaluation {
                quantity: quantity.to_string(),
                time,
                reason: format!(
                    "time is not on the simulation grid ({} points in [{}, {}])",
                    self.times.len(),
                    self.times.first().copied().unwrap_or(f64::NAN),
                    self.times.last().copied().unwrap_or(f64::NAN)
                ),
            })
    }
}

/// Asset realizations stored as a `times × paths` matrix
#[derive(Debug, Clone)]
pub struct SimulatedPaths {
    grid: TimeGrid,
    values: Array2<f64>,
}

impl SimulatedPaths {
    pub fn new(grid: TimeGrid, values: Array2<f64>) -> PricingResult<Self> {
        if values.nrows() != grid.len() {
            return Err(PricingError::DimensionMismatch {
                context: "simulated paths (time rows)".to_string(),
                expected: grid.len(),
                found: values.nrows(),
            });
        }
        validate_paths(values.ncols())?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PricingError::NumericalInstability {
                method: "path simulation".to_string(),
                reason: "simulated values contain non-finite entries".to_string(),
            });
        }
        Ok(SimulatedPaths { grid, values })
    }

    /// Assemble from one `Vec` per path, each holding a value per grid time
    pub fn from_paths(grid: TimeGrid, paths: Vec<Vec<f64>>) -> PricingResult<Self> {
        let n_paths = paths.len();
        let n_times = grid.len();
        if let Some(bad) = paths.iter().find(|p| p.len() != n_times) {
            return Err(PricingError::DimensionMismatch {
                context: "simulated path length".to_string(),
                expected: n_times,
                found: bad.len(),
            });
        }
        let values = Array2::from_shape_fn((n_times, n_paths), |(t, p)| paths[p][t]);
        Self::new(grid, values)
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn number_of_paths(&self) -> usize {
        self.values.ncols()
    }

    pub fn value_at(&self, time: f64, quantity: &str) -> PricingResult<PathVector> {
        let index = self.grid.index_of(time, quantity)?;
        Ok(PathVector::new(time, self.values.row(index).to_owned()))
    }
}

pub(crate) fn check_single_asset(time: f64, asset_index: usize) -> PricingResult<()> {
    if asset_index != 0 {
        return Err(PricingError::ModelEvaluation {
            quantity: format!("asset value #{}", asset_index),
            time,
            reason: "single-asset simulation only provides asset index 0".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_grid_lookup() {
        let grid = TimeGrid::from_observation_times(&[0.5, 1.0]).unwrap();
        assert_eq!(grid.times(), &[0.0, 0.5, 1.0]);
        assert_eq!(grid.index_of(0.5, "numeraire").unwrap(), 1);
        assert_eq!(grid.index_of(1.0 + 1e-12, "numeraire").unwrap(), 2);
        assert!(matches!(
            grid.index_of(0.75, "numeraire"),
            Err(PricingError::ModelEvaluation { .. })
        ));
    }

    #[test]
    fn test_time_grid_keeps_explicit_origin() {
        let grid = TimeGrid::from_observation_times(&[0.0, 1.0]).unwrap();
        assert_eq!(grid.len(), 2);
        assert!(TimeGrid::from_observation_times(&[-1.0, 1.0]).is_err());
        assert!(TimeGrid::new(vec![1.0, 0.5]).is_err());
    }

    #[test]
    fn test_simulated_paths_rows_are_times() {
        let grid = TimeGrid::new(vec![0.0, 1.0]).unwrap();
        let paths = SimulatedPaths::from_paths(grid, vec![vec![100.0, 110.0], vec![100.0, 90.0]])
            .unwrap();
        assert_eq!(paths.number_of_paths(), 2);
        let s1 = paths.value_at(1.0, "asset value").unwrap();
        assert_eq!(s1.to_vec(), vec![110.0, 90.0]);
        assert_eq!(s1.time(), 1.0);
    }

    #[test]
    fn test_simulated_paths_reject_ragged_input() {
        let grid = TimeGrid::new(vec![0.0, 1.0]).unwrap();
        assert!(SimulatedPaths::from_paths(grid, vec![vec![100.0]]).is_err());
    }

    #[test]
    fn test_only_asset_zero() {
        assert!(check_single_asset(1.0, 0).is_ok());
        assert!(check_single_asset(1.0, 1).is_err());
    }
}
