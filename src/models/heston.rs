// src/models/heston.rs
//! Heston Stochastic Volatility Path Simulation
//!
//! # Mathematical Framework
//!
//! The Heston model describes asset price evolution with stochastic volatility:
//! ```text
//! dS_t = r S_t dt + √V_t S_t dW_t^(1)
//! dV_t = κ(θ - V_t) dt + ξ√V_t dW_t^(2)
//! ```
//!
//! Where:
//! - S_t: Asset price
//! - V_t: Instantaneous variance (volatility squared)
//! - κ: Mean reversion speed for variance
//! - θ: Long-term variance level
//! - ξ: Volatility of variance (vol-of-vol)
//! - ρ: Correlation between dW_t^(1) and dW_t^(2)
//!
//! The numeraire is the bank account `N_t = exp(r t)`.
//!
//! # Feller Condition
//!
//! For variance to remain strictly positive, the Feller condition must hold:
//! ```text
//! 2κθ > ξ²
//! ```
//!
//! When violated, variance can hit zero; all schemes below keep it non-negative.
//!
//! # Discretization Schemes
//!
//! 1. **Andersen QE**: Most robust, handles Feller violations gracefully
//! 2. **Alfonsi**: Implicit-style correction on the variance square root
//! 3. **Full Truncation Euler**: Fastest, first-order weak
//!
//! Paths are only stored on the observation grid; `substeps` scheme steps
//! are taken between consecutive grid times.

use super::model::{check_single_asset, AssetModelSimulation, SimulatedPaths, TimeGrid};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::random_variable::PathVector;
use crate::rng::{self, RngFactory};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HestonScheme {
    FullTruncationEuler,
    AndersenQE,
    Alfonsi,
}

#[derive(Clone, Copy, Debug)]
pub struct HestonParams {
    pub s0: f64,    // Initial stock price
    pub v0: f64,    // Initial variance
    pub r: f64,     // Risk-free rate
    pub kappa: f64, // Mean reversion speed
    pub theta: f64, // Long-term variance
    pub xi: f64,    // Volatility of variance (vol-of-vol)
    pub rho: f64,   // Correlation between stock and variance
}

impl Default for HestonParams {
    fn default() -> Self {
        HestonParams {
            s0: 100.0,
            v0: 0.04,
            r: 0.05,
            kappa: 2.0,
            theta: 0.04,
            xi: 0.3,
            rho: -0.7,
        }
    }
}

pub struct Heston {
    pub params: HestonParams,
    pub scheme: HestonScheme,
}

impl Heston {
    pub fn new(params: HestonParams) -> PricingResult<Self> {
        Self::new_with_scheme(params, HestonScheme::AndersenQE)
    }

    pub fn new_with_scheme(params: HestonParams, scheme: HestonScheme) -> PricingResult<Self> {
        Self::validate_params(&params)?;

        let feller = 2.0 * params.kappa * params.theta;
        if feller <= params.xi * params.xi {
            warn!(
                kappa = params.kappa,
                theta = params.theta,
                xi = params.xi,
                "Feller condition violated (2κθ ≤ ξ²), variance may hit zero"
            );
        }

        Ok(Heston { params, scheme })
    }

    fn validate_params(params: &HestonParams) -> PricingResult<()> {
        validate_positive("s0", params.s0)?;
        validate_non_negative("v0", params.v0)?;
        validate_finite("r", params.r)?;
        validate_positive("kappa", params.kappa)?;
        validate_positive("theta", params.theta)?;
        validate_positive("xi", params.xi)?;
        validate_correlation("rho", params.rho)?;

        if params.kappa > 100.0 {
            return Err(PricingError::InvalidParameters {
                parameter: "kappa".to_string(),
                value: params.kappa,
                constraint: "extremely high mean reversion speed (>100) may cause numerical issues"
                    .to_string(),
            });
        }

        if params.xi > 5.0 {
            return Err(PricingError::InvalidParameters {
                parameter: "xi".to_string(),
                value: params.xi,
                constraint: "extremely high vol-of-vol (>5) may cause numerical issues".to_string(),
            });
        }

        if params.theta > 1.0 {
            return Err(PricingError::InvalidParameters {
                parameter: "theta".to_string(),
                value: params.theta,
                constraint: "long-term variance >1 (100% vol) is unrealistic".to_string(),
            });
        }

        Ok(())
    }

    /// Two-factor step: updates both stock price and variance
    pub fn step<R: Rng + ?Sized>(
        &self,
        s: &mut f64,
        v: &mut f64,
        dt: f64,
        sign: f64,
        rng: &mut R,
    ) -> PricingResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PricingError::InvalidParameters {
                parameter: "dt".to_string(),
                value: dt,
                constraint: "must be positive and finite".to_string(),
            });
        }

        let z1 = sign * rng::get_normal_draw(rng);
        let z2 = sign * rng::get_normal_draw(rng);

        match self.scheme {
            HestonScheme::FullTruncationEuler => {
                let (dw_s, dw_v) = self.correlate(z1, z2);
                self.step_full_truncation_euler(s, v, dt, dw_s, dw_v);
            }
            HestonScheme::AndersenQE => {
                // Spot and variance shocks enter QE independently; the
                // correlation is carried by the K1/K2 terms.
                let u: f64 = rng.gen();
                self.step_andersen_qe(s, v, dt, z1, z2, u);
            }
            HestonScheme::Alfonsi => {
                let (dw_s, dw_v) = self.correlate(z1, z2);
                self.step_alfonsi(s, v, dt, dw_s, dw_v);
            }
        }

        if !s.is_finite() || *s <= 0.0 {
            return Err(PricingError::NumericalInstability {
                method: format!("Heston {}", self.scheme_name()),
                reason: format!("stock price became invalid after step: {}", s),
            });
        }

        if !v.is_finite() || *v < 0.0 {
            return Err(PricingError::NumericalInstability {
                method: format!("Heston {}", self.scheme_name()),
                reason: format!("variance became invalid after step: {}", v),
            });
        }

        Ok(())
    }

    fn correlate(&self, z1: f64, z2: f64) -> (f64, f64) {
        let rho = self.params.rho;
        (z1, rho * z1 + (1.0 - rho * rho).sqrt() * z2)
    }

    /// Full Truncation Euler (FTE) scheme
    ///
    /// ```text
    /// V⁺ = max(V_n, 0)
    /// V_{n+1} = V_n + κ(θ - V⁺)Δt + ξ√V⁺ ΔW_v      (stored as max(·, 0))
    /// S_{n+1} = S_n * exp((r - V⁺/2)Δt + √V⁺ ΔW_s)
    /// ```
    fn step_full_truncation_euler(&self, s: &mut f64, v: &mut f64, dt: f64, dw_s: f64, dw_v: f64) {
        let sqrt_dt = dt.sqrt();
        let v_pos = v.max(0.0);
        let sqrt_v = v_pos.sqrt();

        *s *= ((self.params.r - 0.5 * v_pos) * dt + sqrt_v * sqrt_dt * dw_s).exp();

        let dv = self.params.kappa * (self.params.theta - v_pos) * dt
            + self.params.xi * sqrt_v * sqrt_dt * dw_v;
        *v = (*v + dv).max(0.0);
    }

    /// Andersen's Quadratic Exponential (QE) scheme
    ///
    /// ## Variance Evolution
    /// ```text
    /// m  = θ + (V_n - θ)e^(-κΔt)
    /// s² = V_n ξ² e^(-κΔt)/κ (1 - e^(-κΔt)) + θ ξ²/(2κ) (1 - e^(-κΔt))²
    /// ψ  = s²/m²
    /// ```
    /// - ψ ≤ 1.5: `V_{n+1} = a (b + Z_v)²` (moment-matched non-central χ²)
    /// - ψ > 1.5: point mass at zero plus an exponential tail, sampled by
    ///   inverting the distribution function at U
    ///
    /// ## Stock Price Update (γ₁ = γ₂ = ½)
    /// ```text
    /// ln S_{n+1} = ln S_n + rΔt + K0 + K1 V_n + K2 V_{n+1} + √(K3 (V_n + V_{n+1})) Z_s
    /// ```
    fn step_andersen_qe(&self, s: &mut f64, v: &mut f64, dt: f64, z_s: f64, z_v: f64, u: f64) {
        let HestonParams {
            r,
            kappa,
            theta,
            xi,
            rho,
            ..
        } = self.params;
        let ekt = (-kappa * dt).exp();

        let m = theta + (*v - theta) * ekt;
        let s2 = *v * xi * xi * ekt / kappa * (1.0 - ekt)
            + theta * xi * xi / (2.0 * kappa) * (1.0 - ekt).powi(2);
        let psi = s2 / (m * m);
        let psi_c = 1.5;

        let v_next = if psi <= psi_c {
            let b2 = 2.0 / psi - 1.0 + (2.0 / psi * (2.0 / psi - 1.0)).sqrt();
            let a = m / (1.0 + b2);
            a * (b2.sqrt() + z_v).powi(2)
        } else {
            let p = (psi - 1.0) / (psi + 1.0);
            let beta = (1.0 - p) / m;
            if u <= p {
                0.0
            } else {
                ((1.0 - p) / (1.0 - u)).ln() / beta
            }
        }
        .max(0.0);

        let k0 = -rho * kappa * theta / xi * dt;
        let k1 = 0.5 * dt * (kappa * rho / xi - 0.5) - rho / xi;
        let k2 = 0.5 * dt * (kappa * rho / xi - 0.5) + rho / xi;
        let k3 = 0.5 * dt * (1.0 - rho * rho);

        let log_step = r * dt + k0 + k1 * *v + k2 * v_next + (k3 * (*v + v_next)).sqrt() * z_s;
        *s *= log_step.exp();
        *v = v_next;
    }

    /// Alfonsi-style scheme on the variance square root
    ///
    /// ```text
    /// V_aux   = V_n + κ(θ - V_n)Δt + ξ√V_n ΔW_v
    /// V_{n+1} = max(0, V_aux + γ ξ² Δt (1/√V_aux - 1/√V_n)(ΔW_v² - Δt)/(2√Δt))
    /// ```
    /// The stock is advanced log-Euler with the average of both volatilities.
    fn step_alfonsi(&self, s: &mut f64, v: &mut f64, dt: f64, dw_s: f64, dw_v: f64) {
        let sqrt_dt = dt.sqrt();
        let gamma = 0.5;
        let HestonParams {
            r, kappa, theta, xi, ..
        } = self.params;

        let v_prev = v.max(0.0);
        let v_aux = v_prev + kappa * (theta - v_prev) * dt + xi * v_prev.sqrt() * sqrt_dt * dw_v;

        let correction = if v_prev > 0.0 && v_aux > 0.0 {
            gamma * xi * xi * dt * (1.0 / v_aux.sqrt() - 1.0 / v_prev.sqrt()) * (dw_v * dw_v - 1.0)
                * sqrt_dt
                / 2.0
        } else {
            0.0
        };
        let v_next = (v_aux + correction).max(0.0);

        let sqrt_v_avg = 0.5 * (v_prev.sqrt() + v_next.sqrt());
        *s *= ((r - 0.5 * sqrt_v_avg * sqrt_v_avg) * dt + sqrt_v_avg * sqrt_dt * dw_s).exp();
        *v = v_next;
    }

    pub fn scheme_name(&self) -> &'static str {
        match self.scheme {
            HestonScheme::FullTruncationEuler => "Full Truncation Euler",
            HestonScheme::AndersenQE => "Andersen QE",
            HestonScheme::Alfonsi => "Alfonsi",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HestonConfig {
    pub params: HestonParams,
    pub scheme: HestonScheme,
    /// Observation times; 0 is added when missing
    pub times: Vec<f64>,
    pub paths: usize,
    /// Scheme steps between consecutive observation times
    pub substeps: usize,
    pub seed: u64,
    pub use_antithetic: bool,
}

impl Default for HestonConfig {
    fn default() -> Self {
        HestonConfig {
            params: HestonParams::default(),
            scheme: HestonScheme::AndersenQE,
            times: vec![0.25, 0.5, 0.75, 1.0],
            paths: 10_000,
            substeps: 20,
            seed: 12345,
            use_antithetic: false,
        }
    }
}

pub struct HestonSimulation {
    heston: Heston,
    paths: SimulatedPaths,
}

impl HestonSimulation {
    pub fn new(config: HestonConfig) -> PricingResult<Self> {
        validate_paths(config.paths)?;
        if config.substeps == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "substeps".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        let heston = Heston::new_with_scheme(config.params, config.scheme)?;
        let grid = TimeGrid::from_observation_times(&config.times)?;
        let factory = RngFactory::new(config.seed, config.use_antithetic);

        let simulated: PricingResult<Vec<Vec<f64>>> = (0..config.paths)
            .into_par_iter()
            .map(|path_id| {
                let (mut rng, sign) = factory.create_path_rng(path_id);
                let times = grid.times();
                let mut values = Vec::with_capacity(times.len());
                let mut s = heston.params.s0;
                let mut v = heston.params.v0;
                values.push(s);
                for window in times.windows(2) {
                    let dt = (window[1] - window[0]) / config.substeps as f64;
                    for _ in 0..config.substeps {
                        heston.step(&mut s, &mut v, dt, sign, &mut rng)?;
                    }
                    values.push(s);
                }
                Ok(values)
            })
            .collect();

        let paths = SimulatedPaths::from_paths(grid, simulated?)?;
        debug!(
            paths = config.paths,
            scheme = heston.scheme_name(),
            substeps = config.substeps,
            "simulated Heston paths"
        );
        Ok(HestonSimulation { heston, paths })
    }

    pub fn heston(&self) -> &Heston {
        &self.heston
    }
}

impl AssetModelSimulation for HestonSimulation {
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
        self.time_grid().index_of(time, "numeraire")?;
        Ok(self.constant(time, (self.heston.params.r * time).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_heston_schemes() {
        let params = HestonParams {
            rho: -0.5,
            ..Default::default()
        };

        let schemes = [
            HestonScheme::FullTruncationEuler,
            HestonScheme::AndersenQE,
            HestonScheme::Alfonsi,
        ];

        for scheme in &schemes {
            let heston = Heston::new_with_scheme(params, *scheme).expect("Valid parameters");
            let mut rng = StdRng::seed_from_u64(42);

            let mut s = params.s0;
            let mut v = params.v0;

            for _ in 0..100 {
                heston
                    .step(&mut s, &mut v, 0.01, 1.0, &mut rng)
                    .expect("Step should succeed");
                assert!(s > 0.0, "Stock price must remain positive");
                assert!(v >= 0.0, "Variance must be non-negative");
            }
        }
    }

    #[test]
    fn test_feller_condition() {
        let params = HestonParams {
            kappa: 1.0,
            xi: 1.0,
            rho: 0.0,
            ..Default::default()
        };

        // Warns but does not fail
        let _heston = Heston::new(params).expect("Should create despite Feller violation");
    }

    #[test]
    fn test_invalid_parameters() {
        let bad_xi = HestonParams {
            xi: -0.3,
            ..Default::default()
        };
        assert!(Heston::new(bad_xi).is_err());

        let bad_rho = HestonParams {
            rho: 1.5,
            ..Default::default()
        };
        assert!(Heston::new(bad_rho).is_err());

        let bad_spot = HestonParams {
            s0: -100.0,
            ..Default::default()
        };
        assert!(Heston::new(bad_spot).is_err());
    }

    #[test]
    fn test_simulation_discounted_mean() {
        let model = HestonSimulation::new(HestonConfig {
            paths: 40_000,
            times: vec![1.0],
            ..Default::default()
        })
        .unwrap();

        let s = model.asset_value(1.0, 0).unwrap();
        let n = model.numeraire(1.0).unwrap();
        let discounted = s.div(&n).unwrap().average();
        assert!(
            (discounted - 100.0).abs() < 1.0,
            "discounted mean {} should be close to 100",
            discounted
        );
        assert_eq!(model.number_of_paths(), 40_000);
    }

    #[test]
    fn test_simulation_rejects_zero_substeps() {
        let result = HestonSimulation::new(HestonConfig {
            substeps: 0,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
