// src/diagnostics.rs
//! Summaries of a valuation for reporting

use crate::error::{PricingError, PricingResult};
use crate::products::ExerciseSchedule;
use crate::random_variable::PathVector;

const DATE_TOLERANCE: f64 = 1e-10;

/// How many paths exercised on each date
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProfile {
    pub dates: Vec<f64>,
    pub counts: Vec<usize>,
    pub never_exercised: usize,
    pub total_paths: usize,
}

impl ExerciseProfile {
    /// Bin an exercise-time vector against its schedule
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if a path carries a time that is neither an
    /// exercise date nor the never-exercised marker.
    pub fn from_exercise_times(
        schedule: &ExerciseSchedule,
        exercise_time: &PathVector,
    ) -> PricingResult<Self> {
        let dates = schedule.dates().to_vec();
        let marker = schedule.never_exercised_marker();
        let mut counts = vec![0usize; dates.len()];
        let mut never_exercised = 0;

        for &t in exercise_time.realizations().iter() {
            if (t - marker).abs() <= DATE_TOLERANCE {
                never_exercised += 1;
                continue;
            }
            match dates.iter().position(|&d| (d - t).abs() <= DATE_TOLERANCE) {
                Some(i) => counts[i] += 1,
                None => {
                    return Err(PricingError::InvalidConfiguration {
                        field: "exercise_time".to_string(),
                        reason: format!("{} is not an exercise date of the schedule", t),
                    })
                }
            }
        }

        Ok(ExerciseProfile {
            dates,
            counts,
            never_exercised,
            total_paths: exercise_time.len(),
        })
    }

    pub fn fractions(&self) -> Vec<f64> {
        let n = self.total_paths.max(1) as f64;
        self.counts.iter().map(|&c| c as f64 / n).collect()
    }

    pub fn exercised(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Mean exercise date over the paths that exercise, `None` if none do
    pub fn expected_exercise_date(&self) -> Option<f64> {
        let exercised = self.exercised();
        if exercised == 0 {
            return None;
        }
        let weighted: f64 = self
            .dates
            .iter()
            .zip(&self.counts)
            .map(|(&d, &c)| d * c as f64)
            .sum();
        Some(weighted / exercised as f64)
    }
}

/// Monte Carlo statistics of a value vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSummary {
    pub mean: f64,
    pub standard_error: f64,
    pub min: f64,
    pub max: f64,
    pub paths: usize,
}

impl ValueSummary {
    pub fn from_path_vector(value: &PathVector) -> Self {
        ValueSummary {
            mean: value.average(),
            standard_error: value.standard_error(),
            min: value.min(),
            max: value.max(),
            paths: value.len(),
        }
    }

    /// 95% normal confidence interval of the mean
    pub fn confidence_interval(&self) -> (f64, f64) {
        let half_width = 1.96 * self.standard_error;
        (self.mean - half_width, self.mean + half_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn schedule() -> ExerciseSchedule {
        ExerciseSchedule::uniform(vec![1.0, 2.0, 3.0], 1.0, 100.0).unwrap()
    }

    #[test]
    fn test_profile_counts() {
        let times = PathVector::from_vec(0.0, vec![1.0, 3.0, 3.0, 4.0, 1.0]);
        let profile = ExerciseProfile::from_exercise_times(&schedule(), &times).unwrap();

        assert_eq!(profile.counts, vec![2, 0, 2]);
        assert_eq!(profile.never_exercised, 1);
        assert_eq!(profile.exercised(), 4);
        assert_relative_eq!(profile.fractions()[0], 0.4);
        assert_relative_eq!(profile.expected_exercise_date().unwrap(), 2.0);
    }

    #[test]
    fn test_profile_rejects_unknown_time() {
        let times = PathVector::from_vec(0.0, vec![1.0, 2.5]);
        assert!(ExerciseProfile::from_exercise_times(&schedule(), &times).is_err());
    }

    #[test]
    fn test_nothing_exercised() {
        let times = PathVector::constant(0.0, 4.0, 3);
        let profile = ExerciseProfile::from_exercise_times(&schedule(), &times).unwrap();
        assert_eq!(profile.expected_exercise_date(), None);
        assert_eq!(profile.never_exercised, 3);
    }

    #[test]
    fn test_value_summary() {
        let value = PathVector::from_vec(0.0, vec![1.0, 2.0, 3.0, 4.0]);
        let summary = ValueSummary::from_path_vector(&value);
        assert_relative_eq!(summary.mean, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.paths, 4);
        let (lo, hi) = summary.confidence_interval();
        assert!(lo < 2.5 && hi > 2.5);
    }
}
