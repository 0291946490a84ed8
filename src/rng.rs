// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design Philosophy
//!
//! Path simulation needs random numbers that are:
//! 1. **Reproducible**: same seed → same paths (and therefore the same
//!    regression fits and exercise decisions)
//! 2. **Parallel safe**: every path owns its own stream, no shared state
//! 3. **Thread-count independent**: the stream of a path depends only on
//!    `(seed, path_id)`, never on scheduling
//!
//! # Antithetic Streams
//!
//! With antithetic sampling, paths `2k` and `2k + 1` share stream `k`; the
//! second path negates every normal draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
    antithetic: bool,
}

impl RngFactory {
    pub fn new(base_seed: u64, antithetic: bool) -> Self {
        Self {
            base_seed,
            antithetic,
        }
    }

    /// Stream index and sign applied to normal draws for `path_id`
    pub fn stream_for_path(&self, path_id: usize) -> (u64, f64) {
        if self.antithetic {
            ((path_id / 2) as u64, if path_id % 2 == 1 { -1.0 } else { 1.0 })
        } else {
            (path_id as u64, 1.0)
        }
    }

    /// Seeded generator for `path_id` plus the sign of its normal draws
    pub fn create_path_rng(&self, path_id: usize) -> (StdRng, f64) {
        let (stream, sign) = self.stream_for_path(path_id);
        (seed_rng_from_u64(self.base_seed.wrapping_add(stream)), sign)
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
