// src/products/schedule.rs
use crate::error::{validation::*, PricingResult};

/// Exercise opportunities of a Bermudan option
///
/// Index `i` pays `notionals[i] * (S(dates[i]) - strikes[i])` when exercised
/// at `dates[i]`. Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSchedule {
    dates: Vec<f64>,
    notionals: Vec<f64>,
    strikes: Vec<f64>,
}

impl ExerciseSchedule {
    /// # Errors
    ///
    /// `InvalidConfiguration` if the arrays differ in length, are empty or
    /// the dates are not strictly increasing; `InvalidParameters` for a
    /// non-finite notional or strike.
    pub fn new(dates: Vec<f64>, notionals: Vec<f64>, strikes: Vec<f64>) -> PricingResult<Self> {
        validate_strictly_increasing("exercise_dates", &dates)?;
        validate_same_length("notionals", "exercise_dates", dates.len(), notionals.len())?;
        validate_same_length("strikes", "exercise_dates", dates.len(), strikes.len())?;
        for &notional in &notionals {
            validate_finite("notional", notional)?;
        }
        for &strike in &strikes {
            validate_finite("strike", strike)?;
        }
        Ok(ExerciseSchedule {
            dates,
            notionals,
            strikes,
        })
    }

    /// Same notional and strike on every date
    pub fn uniform(dates: Vec<f64>, notional: f64, strike: f64) -> PricingResult<Self> {
        let n = dates.len();
        Self::new(dates, vec![notional; n], vec![strike; n])
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[f64] {
        &self.dates
    }

    pub fn notionals(&self) -> &[f64] {
        &self.notionals
    }

    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    pub fn last_date(&self) -> f64 {
        self.dates[self.dates.len() - 1]
    }

    /// Exercise-time marker of paths that are never exercised
    pub fn never_exercised_marker(&self) -> f64 {
        self.last_date() + 1.0
    }

    /// `(date, notional, strike)` in chronological order
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (f64, f64, f64)> + ExactSizeIterator + '_ {
        self.dates
            .iter()
            .zip(&self.notionals)
            .zip(&self.strikes)
            .map(|((&d, &n), &k)| (d, n, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;

    #[test]
    fn test_valid_schedule() {
        let schedule =
            ExerciseSchedule::new(vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 2.0], vec![90.0, 95.0, 100.0])
                .unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.last_date(), 3.0);
        assert_eq!(schedule.never_exercised_marker(), 4.0);
        let last = schedule.iter().next_back().unwrap();
        assert_eq!(last, (3.0, 2.0, 100.0));
    }

    #[test]
    fn test_mismatched_lengths() {
        let result = ExerciseSchedule::new(vec![1.0, 2.0], vec![1.0], vec![100.0, 100.0]);
        assert!(matches!(result, Err(PricingError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_non_increasing_dates() {
        assert!(ExerciseSchedule::uniform(vec![2.0, 1.0], 1.0, 100.0).is_err());
        assert!(ExerciseSchedule::uniform(vec![1.0, 1.0], 1.0, 100.0).is_err());
        assert!(ExerciseSchedule::uniform(vec![], 1.0, 100.0).is_err());
    }

    #[test]
    fn test_non_finite_strike() {
        let result = ExerciseSchedule::new(vec![1.0], vec![1.0], vec![f64::NAN]);
        assert!(matches!(result, Err(PricingError::InvalidParameters { .. })));
    }
}
