use derive_more::{Display, From};
use serde::Deserialize;
use serde_valid::yaml::FromYamlStr;
use serde_valid::Validate;

// Config Type
#[derive(Debug, Clone)]
pub struct Config {
    // Parameters of the synthetic linear data the fit is run against.
    pub generator: GeneratorConfig,
    // How the fit is reported back to the caller.
    pub report: ReportConfig,
}

impl Config {
    pub fn from_file(file_path: &str) -> Result<Self, ConfigError> {
        let config_file_content = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&config_file_content)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let raw_config = RawConfig::from_yaml_str(s)?;

        fn verify_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue(name, value));
            }
            Ok(())
        }

        // serde_valid bounds do not reject .inf / .nan coming from yaml
        let generator = &raw_config.generator;
        verify_finite("generator.true_slope", generator.true_slope)?;
        verify_finite("generator.true_intercept", generator.true_intercept)?;
        verify_finite("generator.x_std_dev", generator.x_std_dev)?;
        verify_finite("generator.noise_std_dev", generator.noise_std_dev)?;

        Ok(Config { generator: raw_config.generator, report: raw_config.report })
    }

    // Returns a copy with the command line overrides applied on top of the file values.
    pub fn with_overrides(mut self, count: Option<u64>, seed: Option<u64>) -> Self {
        if let Some(count) = count {
            self.generator.count = count;
        }
        if seed.is_some() {
            self.generator.seed = seed;
        }
        self
    }
}

#[derive(Debug, From, Display)]
pub enum ConfigError {
    #[display("Non-finite value for {}: {}", _0, _1)]
    #[from(ignore)]
    NonFiniteValue(&'static str, f64),

    #[display("Serde Error: {}", _0)]
    SerdeError(serde_valid::Error<serde_yaml::Error>),

    #[display("Error Reading Config File: {}", _0)]
    IoError(std::io::Error),
}

impl std::error::Error for ConfigError {}

// Intermediate Config Type as Deserialization Target
#[derive(Debug, Deserialize, Validate)]
pub struct RawConfig {
    #[validate]
    pub generator: GeneratorConfig,
    #[validate]
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Validate, Clone, PartialEq)]
pub struct GeneratorConfig {
    // Number of (x, y) pairs to generate
    #[validate(minimum = 1)]
    pub count: u64,
    // Slope of the line the data is generated from
    pub true_slope: f64,
    // Intercept of the line the data is generated from
    #[serde(default)]
    pub true_intercept: f64,
    // Standard deviation of the zero-mean gaussian the x values are drawn from
    #[validate(exclusive_minimum = 0.0)]
    pub x_std_dev: f64,
    // Standard deviation of the zero-mean gaussian noise added to every y value
    #[validate(minimum = 0.0)]
    pub noise_std_dev: f64,
    // Seed for the random generator, entropy is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Validate, Clone, PartialEq)]
pub struct ReportConfig {
    // Whether every generated point is written into the json report
    #[serde(default)]
    pub include_sample: bool,
    // Number of decimal places in the text report
    #[validate(maximum = 12)]
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { include_sample: false, precision: default_precision() }
    }
}

fn default_precision() -> usize {
    4
}

pub fn get_sample_config() -> Config {
    Config::from_file("../../config.yaml.example").unwrap()
}
