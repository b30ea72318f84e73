use std::error::Error;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

pub use linear_regression_estimator::{fit_line, FitResult, LinearRegressionEstimationError};

use crate::sample::DataPoint;

pub mod linear_regression_estimator;

/// A model built once from data points and then evaluated at new inputs.
pub trait Estimator<'de, Input, Output>: Serialize + Deserialize<'de> + Debug {
    type Error: Error + Debug;

    fn build(data: Vec<DataPoint<Input, Output>>) -> Result<Self, Self::Error>;

    fn estimate(&self, x: Input) -> Output;

    /// Evaluates the model at every input, pairing each input with its estimate.
    fn estimate_all<I>(&self, inputs: I) -> Vec<DataPoint<Input, Output>>
    where
        I: IntoIterator<Item = Input>,
        Input: Copy,
    {
        inputs.into_iter().map(|x| DataPoint { x, y: self.estimate(x) }).collect()
    }
}
