use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::estimator::Estimator;
use crate::sample::{DataPoint, Sample};

/// Slope and intercept of the least squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    slope: f64,
    intercept: f64,
}

impl FitResult {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// `y - (slope * x + intercept)` for every point, in sample order.
    pub fn residuals(&self, sample: &Sample) -> Vec<f64> {
        sample.iter().map(|p| p.y as f64 - self.estimate(p.x as f64)).collect()
    }

    /// `None` for an empty sample.
    pub fn mean_squared_error(&self, sample: &Sample) -> Option<f64> {
        if sample.is_empty() {
            return None;
        }
        let sum: f64 = self.residuals(sample).iter().map(|r| r * r).sum();
        Some(sum / sample.len() as f64)
    }
}

impl<'de> Estimator<'de, f64, f64> for FitResult {
    type Error = LinearRegressionEstimationError;

    fn build(data: Vec<DataPoint<f64, f64>>) -> Result<Self, LinearRegressionEstimationError> {
        fit_points(&data)
    }

    fn estimate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form least squares fit: population covariance of x and y over the variance of x.
///
/// Fails with [`LinearRegressionEstimationError::DegenerateInputError`] when every x is the same.
pub fn fit_line(sample: &Sample) -> Result<FitResult, LinearRegressionEstimationError> {
    fit_points(sample.points())
}

fn fit_points<X, Y>(data: &[DataPoint<X, Y>]) -> Result<FitResult, LinearRegressionEstimationError>
where
    X: Copy + Into<f64>,
    Y: Copy + Into<f64>,
{
    if data.is_empty() {
        return Err(LinearRegressionEstimationError::EmptyDataError);
    }

    if data.len() == 1 {
        return Err(LinearRegressionEstimationError::NotEnoughDataError(data.len()));
    }

    let points: Vec<(f64, f64)> = data.iter().map(|p| (p.x.into(), p.y.into())).collect();

    if let Some(index) = points.iter().position(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(LinearRegressionEstimationError::NonFiniteValueError(index));
    }

    // Checked on the raw values, a mean computed in floating point could hide this
    let first_x = points[0].0;
    if points.iter().all(|(x, _)| *x == first_x) {
        return Err(LinearRegressionEstimationError::DegenerateInputError);
    }

    let n = points.len() as f64;
    let (sum_x, sum_y) = points.iter().fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let (mean_x, mean_y) = (sum_x / n, sum_y / n);
    if !mean_x.is_finite() || !mean_y.is_finite() {
        return Err(LinearRegressionEstimationError::NumericalOverflowError);
    }

    // Deviations are measured in a power of two near the largest one,
    // which keeps their squares inside the f64 range without rounding them
    let largest = points.iter().map(|(x, _)| (x - mean_x).abs()).fold(0.0, f64::max);
    if !largest.is_finite() {
        return Err(LinearRegressionEstimationError::NumericalOverflowError);
    }
    if largest <= 0.0 {
        return Err(LinearRegressionEstimationError::DegenerateInputError);
    }
    let unit = 2f64.powi(largest.log2().floor().clamp(-1000.0, 1000.0) as i32);

    let (covariance, variance) = points.iter().fold((0.0, 0.0), |(c, v), (x, y)| {
        let dx = (x - mean_x) / unit;
        let dy = y - mean_y;
        (c + dx * dy, v + dx * dx)
    });

    // The 1/n of the population moments cancels in the ratio
    let slope = covariance / variance / unit;
    let intercept = mean_y - slope * mean_x;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(LinearRegressionEstimationError::NumericalOverflowError);
    }

    debug!(
        "Fitted {} points: covariance {}, variance {} in units of {}, slope {}, intercept {}",
        points.len(),
        covariance,
        variance,
        unit,
        slope,
        intercept
    );

    Ok(FitResult { slope, intercept })
}

#[derive(Debug, Error, PartialEq)]
pub enum LinearRegressionEstimationError {
    #[error("Data provided is empty")]
    EmptyDataError,

    #[error("Data provided is not enough: need at least 2 points, got {0}")]
    NotEnoughDataError(usize),

    #[error("Data point {0} has a non-finite coordinate")]
    NonFiniteValueError(usize),

    #[error("Degenerate input: all x values are identical, the slope is undefined")]
    DegenerateInputError,

    #[error("Fitted parameters overflowed the f64 range")]
    NumericalOverflowError,
}
