// src/random_variable.rs
//! Per-path random variables
//!
//! # Representation
//!
//! A [`PathVector`] is a random variable sampled on the simulation's path
//! set: one realization per Monte Carlo path plus the time at which it is
//! observed (its filtration time). All vectors produced for one simulation
//! have the same length and are indexed consistently by path.
//!
//! # Parallelism
//!
//! Elementwise operations are data-parallel across paths and dispatched with
//! `ndarray::Zip::par_map_collect` (rayon). No two paths interact, so the
//! only synchronization is the implicit join at the end of each operation.

use crate::error::{PricingError, PricingResult};
use crate::regression::estimator::ConditionalExpectationRegression;
use ndarray::{Array1, ArrayView1, Zip};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, PartialEq)]
pub struct PathVector {
    time: f64,
    realizations: Array1<f64>,
}

impl PathVector {
    pub fn new(time: f64, realizations: Array1<f64>) -> Self {
        PathVector { time, realizations }
    }

    pub fn from_vec(time: f64, realizations: Vec<f64>) -> Self {
        Self::new(time, Array1::from_vec(realizations))
    }

    /// Broadcast a scalar to `paths` realizations
    pub fn constant(time: f64, value: f64, paths: usize) -> Self {
        Self::new(time, Array1::from_elem(paths, value))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Same realizations observed at a different time
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn len(&self) -> usize {
        self.realizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realizations.is_empty()
    }

    /// Read-only view on the per-path values
    pub fn realizations(&self) -> ArrayView1<'_, f64> {
        self.realizations.view()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.realizations.to_vec()
    }

    pub fn get(&self, path: usize) -> Option<f64> {
        self.realizations.get(path).copied()
    }

    pub fn is_deterministic(&self) -> bool {
        match self.realizations.iter().next() {
            Some(&first) => self.realizations.iter().all(|&v| v == first),
            None => true,
        }
    }

    fn check_paths(&self, other: &PathVector, context: &str) -> PricingResult<()> {
        if self.len() != other.len() {
            return Err(PricingError::DimensionMismatch {
                context: context.to_string(),
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(())
    }

    fn map<F>(&self, f: F) -> PathVector
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        let realizations = Zip::from(&self.realizations).par_map_collect(|&x| f(x));
        PathVector::new(self.time, realizations)
    }

    fn zip_with<F>(&self, other: &PathVector, context: &str, f: F) -> PricingResult<PathVector>
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        self.check_paths(other, context)?;
        let realizations = Zip::from(&self.realizations)
            .and(&other.realizations)
            .par_map_collect(|&x, &y| f(x, y));
        Ok(PathVector::new(self.time.max(other.time), realizations))
    }

    pub fn add(&self, other: &PathVector) -> PricingResult<PathVector> {
        self.zip_with(other, "add", |x, y| x + y)
    }

    pub fn sub(&self, other: &PathVector) -> PricingResult<PathVector> {
        self.zip_with(other, "sub", |x, y| x - y)
    }

    pub fn mul(&self, other: &PathVector) -> PricingResult<PathVector> {
        self.zip_with(other, "mul", |x, y| x * y)
    }

    pub fn div(&self, other: &PathVector) -> PricingResult<PathVector> {
        self.zip_with(other, "div", |x, y| x / y)
    }

    /// Elementwise `max(x, floor)`
    pub fn floor(&self, floor: f64) -> PathVector {
        self.map(|x| x.max(floor))
    }

    /// Elementwise `min(x, cap)`
    pub fn cap(&self, cap: f64) -> PathVector {
        self.map(|x| x.min(cap))
    }

    pub fn pow(&self, exponent: i32) -> PathVector {
        self.map(|x| x.powi(exponent))
    }

    pub fn abs(&self) -> PathVector {
        self.map(f64::abs)
    }

    pub fn average(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        self.realizations.sum() / self.len() as f64
    }

    /// Population variance of the realizations
    pub fn variance(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        let mean = self.average();
        self.realizations
            .iter()
            .map(|&x| (x - mean) * (x - mean))
            .sum::<f64>()
            / self.len() as f64
    }

    /// Monte Carlo standard error of [`average`](Self::average)
    pub fn standard_error(&self) -> f64 {
        (self.variance() / self.len() as f64).sqrt()
    }

    pub fn min(&self) -> f64 {
        self.realizations.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.realizations.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Pathwise choice between two vectors
    ///
    /// Returns `when_non_negative[p]` where `trigger[p] >= 0` and
    /// `when_negative[p]` otherwise. A zero trigger selects the first branch.
    pub fn select(
        trigger: &PathVector,
        when_non_negative: &PathVector,
        when_negative: &PathVector,
    ) -> PricingResult<PathVector> {
        trigger.check_paths(when_non_negative, "select")?;
        trigger.check_paths(when_negative, "select")?;
        let realizations = Zip::from(&trigger.realizations)
            .and(&when_non_negative.realizations)
            .and(&when_negative.realizations)
            .par_map_collect(|&t, &a, &b| if t >= 0.0 { a } else { b });
        let time = trigger
            .time
            .max(when_non_negative.time)
            .max(when_negative.time);
        Ok(PathVector::new(time, realizations))
    }

    /// Least-squares projection of `self` on the span of `basis`
    pub fn conditional_expectation(&self, basis: &[PathVector]) -> PricingResult<PathVector> {
        ConditionalExpectationRegression::new(basis)?.estimate(self)
    }
}

impl Add<f64> for &PathVector {
    type Output = PathVector;

    fn add(self, rhs: f64) -> PathVector {
        self.map(|x| x + rhs)
    }
}

impl Sub<f64> for &PathVector {
    type Output = PathVector;

    fn sub(self, rhs: f64) -> PathVector {
        self.map(|x| x - rhs)
    }
}

impl Mul<f64> for &PathVector {
    type Output = PathVector;

    fn mul(self, rhs: f64) -> PathVector {
        self.map(|x| x * rhs)
    }
}

impl Div<f64> for &PathVector {
    type Output = PathVector;

    fn div(self, rhs: f64) -> PathVector {
        self.map(|x| x / rhs)
    }
}

impl Neg for &PathVector {
    type Output = PathVector;

    fn neg(self) -> PathVector {
        self.map(|x| -x)
    }
}
