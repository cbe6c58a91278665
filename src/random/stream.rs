//! Seeded random stream owned by one replica
//!
//! Wraps a `StdRng` and provides the four samplers the cafe model needs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Smallest uniform sample fed into a logarithm
pub const UNIFORM_EPSILON: f64 = 1e-12;

/// Poisson means above this use the normal approximation
pub const NORMAL_APPROXIMATION_THRESHOLD: f64 = 15.0;

/// Deterministic random stream for one replica
///
/// # Example
/// ```
/// use cafe_queue_simulator::random::RandomStream;
/// use cafe_queue_simulator::types::SimulationConfig;
///
/// let config = SimulationConfig::default();
/// let mut a = RandomStream::new(config.replica_seed(3));
/// let mut b = RandomStream::new(config.replica_seed(3));
/// assert_eq!(a.uniform(), b.uniform());
/// ```
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: StdRng,
    seed: u64,
}

impl RandomStream {
    /// Create a stream from an explicit seed
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed }
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform sample in `[0, 1)`
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform sample in `(0, 1)`, safe to pass to `ln`
    fn positive_uniform(&mut self) -> f64 {
        let u = self.uniform();
        if u <= 0.0 {
            UNIFORM_EPSILON
        } else {
            u
        }
    }

    /// Exponential sample with the given rate, by inverse CDF
    ///
    /// `rate` must be positive; service stages guard undefined rates before
    /// calling this.
    pub fn exponential(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0, "exponential rate must be positive, got {}", rate);
        -self.positive_uniform().ln() / rate
    }

    /// Index drawn with probability proportional to `weights`
    ///
    /// Weights are expected to sum to about one. When rounding leaves the
    /// draw above the cumulative total the last index is returned; an empty
    /// slice yields 0.
    pub fn categorical(&mut self, weights: &[f64]) -> usize {
        let u = self.uniform();
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if u <= cumulative {
                return index;
            }
        }
        weights.len().saturating_sub(1)
    }

    /// Number of events of a Poisson process with the given mean
    ///
    /// Exact (Knuth's product of uniforms) up to
    /// [`NORMAL_APPROXIMATION_THRESHOLD`]; above it a Box-Muller normal
    /// sample rounded to the nearest integer and floored at zero.
    pub fn poisson(&mut self, mean: f64) -> usize {
        if !(mean > 0.0) {
            return 0;
        }

        if mean > NORMAL_APPROXIMATION_THRESHOLD {
            let u1 = self.positive_uniform();
            let u2 = self.uniform();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
            let k = (mean + mean.sqrt() * z + 0.5).floor();
            return if k < 0.0 { 0 } else { k as usize };
        }

        let limit = (-mean).exp();
        let mut product = 1.0;
        let mut k = 0;
        loop {
            k += 1;
            product *= self.uniform();
            if product <= limit {
                return k - 1;
            }
        }
    }
}
