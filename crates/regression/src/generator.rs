//! Synthetic samples drawn around a known line, from a caller-supplied random source.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sample::{DataPoint, Sample};

pub const DEFAULT_TRUE_SLOPE: f64 = 3.0;
pub const DEFAULT_TRUE_INTERCEPT: f64 = 0.0;
pub const DEFAULT_X_STD_DEV: f64 = 2.0;
pub const DEFAULT_NOISE_STD_DEV: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub true_slope: f64,
    pub true_intercept: f64,
    pub x_std_dev: f64,
    pub noise_std_dev: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            true_slope: DEFAULT_TRUE_SLOPE,
            true_intercept: DEFAULT_TRUE_INTERCEPT,
            x_std_dev: DEFAULT_X_STD_DEV,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        fn invalid(name: &'static str, value: f64, reason: &str) -> GeneratorError {
            GeneratorError::InvalidArgumentError { name, reason: format!("{} ({})", reason, value) }
        }

        if !self.true_slope.is_finite() {
            return Err(invalid("true_slope", self.true_slope, "must be finite"));
        }
        if !self.true_intercept.is_finite() {
            return Err(invalid("true_intercept", self.true_intercept, "must be finite"));
        }
        // A zero spread in x would make every generated sample degenerate
        if !(self.x_std_dev.is_finite() && self.x_std_dev > 0.0) {
            return Err(invalid("x_std_dev", self.x_std_dev, "must be finite and positive"));
        }
        if !(self.noise_std_dev.is_finite() && self.noise_std_dev >= 0.0) {
            return Err(invalid("noise_std_dev", self.noise_std_dev, "must be finite and non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgumentError { name: &'static str, reason: String },

    #[error("Failed to build normal distribution: {0}")]
    DistributionError(#[from] NormalError),
}

/// Generator parameters bundled with the random source they draw from.
#[derive(Debug, Clone)]
pub struct SampleGenerator<R: Rng = StdRng> {
    params: GeneratorParams,
    x_distribution: Normal<f64>,
    noise_distribution: Normal<f64>,
    rng: R,
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(params: GeneratorParams, rng: R) -> Result<Self, GeneratorError> {
        params.validate()?;
        let x_distribution = Normal::new(0.0, params.x_std_dev)?;
        let noise_distribution = Normal::new(0.0, params.noise_std_dev)?;

        Ok(SampleGenerator { params, x_distribution, noise_distribution, rng })
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    pub fn generate(&mut self, count: i64) -> Result<Sample, GeneratorError> {
        draw(
            &mut self.rng,
            &self.params,
            &self.x_distribution,
            &self.noise_distribution,
            count,
        )
    }
}

impl SampleGenerator<StdRng> {
    pub fn seeded(params: GeneratorParams, seed: u64) -> Result<Self, GeneratorError> {
        Self::new(params, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(params: GeneratorParams) -> Result<Self, GeneratorError> {
        Self::new(params, StdRng::from_entropy())
    }
}

/// Draws `count` points with the default parameters
/// (slope 3, intercept 0, x spread 2, noise spread 0.5).
pub fn generate_sample<R: Rng + ?Sized>(rng: &mut R, count: i64) -> Result<Sample, GeneratorError> {
    let params = GeneratorParams::default();
    let x_distribution = Normal::new(0.0, params.x_std_dev)?;
    let noise_distribution = Normal::new(0.0, params.noise_std_dev)?;
    draw(rng, &params, &x_distribution, &noise_distribution, count)
}

fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    params: &GeneratorParams,
    x_distribution: &Normal<f64>,
    noise_distribution: &Normal<f64>,
    count: i64,
) -> Result<Sample, GeneratorError> {
    if count < 1 {
        return Err(GeneratorError::InvalidArgumentError {
            name: "count",
            reason: format!("must be at least 1, got {}", count),
        });
    }
    let count = usize::try_from(count).map_err(|_| GeneratorError::InvalidArgumentError {
        name: "count",
        reason: format!("{} does not fit in memory on this platform", count),
    })?;

    let mut points: Vec<DataPoint<f32, f32>> = Vec::new();
    points.try_reserve_exact(count).map_err(|e| GeneratorError::InvalidArgumentError {
        name: "count",
        reason: format!("cannot allocate {} points: {}", count, e),
    })?;

    debug!("Generating {} points around y = {} * x + {}", count, params.true_slope, params.true_intercept);

    points.extend((0..count).map(|_| {
        let x = x_distribution.sample(&mut *rng);
        let noise = noise_distribution.sample(&mut *rng);
        let y = params.true_slope * x + params.true_intercept + noise;
        DataPoint { x: x as f32, y: y as f32 }
    }));
    Ok(Sample::new(points))
}
