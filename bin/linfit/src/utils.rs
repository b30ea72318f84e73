use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use config::{Config, ConfigError};
use regression::{
    fit_line, DataPoint, Estimator, FitResult, GeneratorError, GeneratorParams,
    LinearRegressionEstimationError, Sample, SampleGenerator,
};

#[derive(Debug, Serialize)]
pub struct FitReport {
    pub count: usize,
    pub seed: Option<u64>,
    pub generator: GeneratorParams,
    pub fit: FitResult,
    pub mean_squared_error: f64,
    // End points of the fitted line over the sample's x range
    pub line: Vec<DataPoint<f64, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Sample>,
}

impl FitReport {
    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self, precision: usize) -> String {
        let g = &self.generator;
        let line = self
            .line
            .iter()
            .map(|point| format!("({:.p$}, {:.p$})", point.x, point.y, p = precision))
            .collect::<Vec<_>>()
            .join(" to ");
        let mut lines = vec![
            format!(
                "Generated {} points around y = {:.p$} * x + {:.p$} (x spread {:.p$}, noise spread {:.p$})",
                self.count,
                g.true_slope,
                g.true_intercept,
                g.x_std_dev,
                g.noise_std_dev,
                p = precision
            ),
            format!(
                "Fitted line: y = {:.p$} * x + {:.p$}",
                self.fit.slope(),
                self.fit.intercept(),
                p = precision
            ),
            format!("Mean squared error: {:.p$}", self.mean_squared_error, p = precision),
            format!("Line from {}", line),
        ];
        if let Some(seed) = self.seed {
            lines.push(format!("Seed: {}", seed));
        }
        lines.join("\n")
    }
}

pub fn load_config(path: &str, count: Option<u64>, seed: Option<u64>) -> Result<Config, PipelineError> {
    let config = Config::from_file(path)
        .map_err(|e| PipelineError::ConfigErr(path.to_string(), e))?;
    Ok(config.with_overrides(count, seed))
}

pub fn run_pipeline(config: &Config) -> Result<FitReport, PipelineError> {
    let generator_config = &config.generator;
    let params = GeneratorParams {
        true_slope: generator_config.true_slope,
        true_intercept: generator_config.true_intercept,
        x_std_dev: generator_config.x_std_dev,
        noise_std_dev: generator_config.noise_std_dev,
    };
    let count = i64::try_from(generator_config.count)
        .map_err(|_| PipelineError::CountOutOfRangeErr(generator_config.count))?;

    let mut generator = match generator_config.seed {
        Some(seed) => {
            debug!("Seeding generator with {}", seed);
            SampleGenerator::seeded(params, seed)?
        }
        None => SampleGenerator::from_entropy(params)?,
    };

    let sample = generator.generate(count)?;
    info!("{} points generated", sample.len());

    let fit = fit_line(&sample)?;
    info!("Fitted y = {} * x + {}", fit.slope(), fit.intercept());

    build_report(config, params, sample, fit)
}

fn build_report(
    config: &Config,
    params: GeneratorParams,
    sample: Sample,
    fit: FitResult,
) -> Result<FitReport, PipelineError> {
    let (min_x, max_x) = sample.x_range().ok_or(LinearRegressionEstimationError::EmptyDataError)?;
    let mean_squared_error =
        fit.mean_squared_error(&sample).ok_or(LinearRegressionEstimationError::EmptyDataError)?;

    let line = fit.estimate_all([min_x as f64, max_x as f64]);

    Ok(FitReport {
        count: sample.len(),
        seed: config.generator.seed,
        generator: params,
        fit,
        mean_squared_error,
        line,
        sample: config.report.include_sample.then_some(sample),
    })
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load config file {0}: {1}")]
    ConfigErr(String, ConfigError),

    #[error("Failed to generate sample: {0}")]
    GeneratorErr(#[from] GeneratorError),

    #[error("Failed to fit line: {0}")]
    EstimationErr(#[from] LinearRegressionEstimationError),

    #[error("Requested count {0} is out of range")]
    CountOutOfRangeErr(u64),

    #[error("Failed to serialize report: {0}")]
    SerializeErr(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use config::Config;
    use regression::Estimator;

    use crate::utils::{load_config, run_pipeline, PipelineError};

    fn test_config(count: u64, include_sample: bool) -> Config {
        let config = format!(
            r#"
generator:
  count: {}
  true_slope: 3.0
  x_std_dev: 2.0
  noise_std_dev: 0.5
  seed: 42
report:
  include_sample: {}
  precision: 3
"#,
            count, include_sample
        );
        Config::from_yaml_str(&config).unwrap()
    }

    #[test]
    fn test_should_fit_generated_sample() {
        let report = run_pipeline(&test_config(1000, false)).unwrap();

        assert_eq!(report.count, 1000);
        assert_eq!(report.seed, Some(42));
        assert!(report.sample.is_none());
        assert_abs_diff_eq!(report.fit.slope(), 3.0, epsilon = 0.1);
        assert_abs_diff_eq!(report.fit.intercept(), 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(report.mean_squared_error, 0.25, epsilon = 0.05);
    }

    #[test]
    fn test_line_spans_the_sample_on_the_fitted_line() {
        let report = run_pipeline(&test_config(200, true)).unwrap();
        let sample = report.sample.as_ref().unwrap();
        let (min_x, max_x) = sample.x_range().unwrap();

        let (start, end) = (report.line[0], report.line[1]);
        assert_eq!(report.line.len(), 2);
        assert_eq!(start.x, min_x as f64);
        assert_eq!(end.x, max_x as f64);
        assert_abs_diff_eq!(start.y, report.fit.estimate(start.x), epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, report.fit.estimate(end.x), epsilon = 1e-12);
    }

    #[test]
    fn test_same_seed_gives_same_report() {
        let first = run_pipeline(&test_config(100, false)).unwrap();
        let second = run_pipeline(&test_config(100, false)).unwrap();

        assert_eq!(first.fit, second.fit);
        assert_eq!(first.to_text(3), second.to_text(3));
    }

    #[test]
    fn test_single_point_cannot_be_fitted() {
        assert!(matches!(
            run_pipeline(&test_config(1, false)),
            Err(PipelineError::EstimationErr(_))
        ));
    }

    #[test]
    fn test_unreadable_config_is_an_error() {
        assert!(matches!(
            load_config("does-not-exist.yaml", None, None),
            Err(PipelineError::ConfigErr(path, _)) if path == "does-not-exist.yaml"
        ));
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let config = load_config("../../config.yaml.example", Some(7), Some(9)).unwrap();
        assert_eq!(config.generator.count, 7);
        assert_eq!(config.generator.seed, Some(9));
    }

    #[test]
    fn test_count_beyond_i64_is_rejected() {
        let config = test_config(10, false).with_overrides(Some(u64::MAX), None);
        assert!(matches!(
            run_pipeline(&config),
            Err(PipelineError::CountOutOfRangeErr(u64::MAX))
        ));
    }

    #[test]
    fn test_json_report_includes_sample_only_when_asked() {
        let json = run_pipeline(&test_config(5, false)).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("sample").is_none());
        assert!(value["fit"]["slope"].is_f64());
        assert_eq!(value["line"].as_array().unwrap().len(), 2);

        let json = run_pipeline(&test_config(5, true)).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sample"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_text_report_uses_precision() {
        let report = run_pipeline(&test_config(10, false)).unwrap();
        let text = report.to_text(2);

        assert!(text.contains("Generated 10 points around y = 3.00 * x + 0.00"), "{}", text);
        assert!(text.contains(&format!("Fitted line: y = {:.2} * x", report.fit.slope())), "{}", text);
        assert!(text.ends_with("Seed: 42"), "{}", text);
    }
}
