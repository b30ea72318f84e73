//! Synthetic linear data and the closed-form least squares line fit.

pub use estimator::{fit_line, Estimator, FitResult, LinearRegressionEstimationError};
pub use generator::{generate_sample, GeneratorError, GeneratorParams, SampleGenerator};
pub use sample::{DataPoint, Sample};

pub mod estimator;
pub mod generator;
mod sample;
