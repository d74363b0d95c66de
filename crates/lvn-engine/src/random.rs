//! Seeded per-instance random source.
//!
//! Every simulation owns exactly one [`RandomSource`]. There is no
//! process-wide generator: two instances with the same seed and the same
//! draw order produce bit-identical streams, and instances on different
//! threads never contend.

use rand::distr::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Gamma, Normal, Poisson};
use std::error::Error;
use std::fmt;

/// Errors from drawing a variate with invalid distribution parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum SamplingError {
    /// A Poisson mean was negative or not finite.
    InvalidMean {
        /// The rejected mean.
        mean: f64,
    },
    /// The underlying distribution rejected its parameters.
    InvalidParameters {
        /// Distribution name.
        distribution: &'static str,
        /// Description from the distribution constructor.
        reason: String,
    },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMean { mean } => {
                write!(f, "poisson mean must be finite and >= 0, got {mean}")
            }
            Self::InvalidParameters {
                distribution,
                reason,
            } => write!(f, "invalid {distribution} parameters: {reason}"),
        }
    }
}

impl Error for SamplingError {}

/// A seeded ChaCha8 generator with the samplers the integrator needs.
///
/// # Examples
///
/// ```
/// use lvn_engine::RandomSource;
///
/// let mut a = RandomSource::new(7);
/// let mut b = RandomSource::new(7);
/// assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
/// assert_eq!(a.poisson(3.5).unwrap(), b.poisson(3.5).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Largest mean [`poisson`](Self::poisson) accepts; the sampler
    /// rejects anything above it.
    pub const MAX_POISSON_MEAN: f64 = 1.844e19;

    /// Create a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reset internal state deterministically.
    pub fn seed(&mut self, value: u64) {
        *self = Self::new(value);
    }

    /// The seed of the current stream.
    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    /// Uniform real in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform real in `[lo, hi)`; returns `lo` when the range is a point.
    pub fn uniform_range(&mut self, lo: f64, hi: f64) -> Result<f64, SamplingError> {
        if lo == hi && lo.is_finite() {
            return Ok(lo);
        }
        let dist = Uniform::new(lo, hi).map_err(|e| SamplingError::InvalidParameters {
            distribution: "uniform",
            reason: e.to_string(),
        })?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Normal variate with the given mean and standard deviation.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> Result<f64, SamplingError> {
        let dist = Normal::new(mean, std_dev).map_err(|e| SamplingError::InvalidParameters {
            distribution: "normal",
            reason: e.to_string(),
        })?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Poisson count with the given mean.
    ///
    /// A zero mean returns 0 without advancing the stream.
    pub fn poisson(&mut self, mean: f64) -> Result<u64, SamplingError> {
        if !mean.is_finite() || mean < 0.0 {
            return Err(SamplingError::InvalidMean { mean });
        }
        if mean == 0.0 {
            return Ok(0);
        }
        let dist = Poisson::new(mean).map_err(|e| SamplingError::InvalidParameters {
            distribution: "poisson",
            reason: e.to_string(),
        })?;
        let count: f64 = dist.sample(&mut self.rng);
        Ok(count as u64)
    }

    /// Gamma variate with the given shape and scale.
    pub fn gamma(&mut self, shape: f64, scale: f64) -> Result<f64, SamplingError> {
        let dist = Gamma::new(shape, scale).map_err(|e| SamplingError::InvalidParameters {
            distribution: "gamma",
            reason: e.to_string(),
        })?;
        Ok(dist.sample(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RandomSource::new(42);
        let mut b = RandomSource::new(42);
        for _ in 0..100 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
            assert_eq!(a.poisson(2.0).unwrap(), b.poisson(2.0).unwrap());
            assert_eq!(
                a.gamma(3.0, 0.5).unwrap().to_bits(),
                b.gamma(3.0, 0.5).unwrap().to_bits()
            );
        }
    }

    #[test]
    fn reseed_restarts_stream() {
        let mut rng = RandomSource::new(1);
        let first: Vec<u64> = (0..10).map(|_| rng.uniform().to_bits()).collect();
        rng.seed(1);
        let again: Vec<u64> = (0..10).map(|_| rng.uniform().to_bits()).collect();
        assert_eq!(first, again);
        assert_eq!(rng.current_seed(), 1);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RandomSource::new(1);
        let mut b = RandomSource::new(2);
        let sa: Vec<u64> = (0..8).map(|_| a.uniform().to_bits()).collect();
        let sb: Vec<u64> = (0..8).map(|_| b.uniform().to_bits()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut rng = RandomSource::new(3);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u), "{u}");
        }
    }

    #[test]
    fn uniform_range_point_and_inverted() {
        let mut rng = RandomSource::new(3);
        assert_eq!(rng.uniform_range(0.25, 0.25).unwrap(), 0.25);
        match rng.uniform_range(1.0, 0.0) {
            Err(SamplingError::InvalidParameters {
                distribution: "uniform",
                ..
            }) => {}
            other => panic!("expected InvalidParameters, got {other:?}"),
        }
    }

    #[test]
    fn poisson_zero_mean_does_not_advance() {
        let mut a = RandomSource::new(9);
        let mut b = RandomSource::new(9);
        assert_eq!(a.poisson(0.0).unwrap(), 0);
        assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
    }

    #[test]
    fn poisson_rejects_negative_and_nan() {
        let mut rng = RandomSource::new(0);
        for mean in [-1.0, f64::NAN, f64::INFINITY] {
            match rng.poisson(mean) {
                Err(SamplingError::InvalidMean { .. }) => {}
                other => panic!("expected InvalidMean for {mean}, got {other:?}"),
            }
        }
    }

    #[test]
    fn poisson_sample_mean_is_close() {
        let mut rng = RandomSource::new(11);
        let n = 20_000;
        let total: u64 = (0..n).map(|_| rng.poisson(4.0).unwrap()).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 4.0).abs() < 0.1, "sample mean {mean}");
    }

    #[test]
    fn gamma_rejects_zero_shape() {
        let mut rng = RandomSource::new(0);
        assert!(rng.gamma(0.0, 1.0).is_err());
        assert!(rng.gaussian(0.0, -1.0).is_err());
    }
}
