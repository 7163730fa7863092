//! Configuration structures for the equity returns pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field normalization configuration.
    pub normalizer: NormalizerConfig,
    /// Series construction configuration.
    pub series: SeriesConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing sections fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        self.normalizer.validate()?;
        self.metrics.validate()
    }
}

/// Field normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Character stripped from price text before parsing.
    pub thousands_separator: char,
    /// `chrono` format strings tried in order for textual dates.
    pub date_formats: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d-%m-%Y".to_string(),
                "%b %d, %Y".to_string(),
                "%Y/%m/%d".to_string(),
            ],
        }
    }
}

impl NormalizerConfig {
    fn validate(&self) -> Result<()> {
        if self.date_formats.is_empty() {
            return Err(Error::config("date_formats must not be empty"));
        }
        if self.thousands_separator.is_ascii_digit() || self.thousands_separator == '.' {
            return Err(Error::config(format!(
                "thousands_separator {:?} would corrupt numbers",
                self.thousands_separator
            )));
        }
        Ok(())
    }
}

/// What to do with a record whose date cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Drop the record, log a warning and keep it in the skipped list.
    #[default]
    Skip,
    /// Fail the whole series.
    Abort,
}

/// Series construction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Invalid date handling.
    pub invalid_date_policy: InvalidDatePolicy,
}

/// Which dates enter a correlation computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationJoin {
    /// Dates where every instrument has a return.
    #[default]
    AllInstruments,
    /// Dates where both instruments of a pair have a return.
    Pairwise,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Minimum number of points for standard deviation and correlation.
    pub min_observations: usize,
    /// Volatility at or below this is treated as zero (Sharpe becomes missing).
    pub zero_volatility_epsilon: f64,
    /// Date join used by correlation.
    pub correlation_join: CorrelationJoin,
    /// Default bin count for return histograms.
    pub histogram_bins: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            min_observations: 2,
            zero_volatility_epsilon: 1e-12,
            correlation_join: CorrelationJoin::AllInstruments,
            histogram_bins: 10,
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<()> {
        if self.min_observations < 2 {
            return Err(Error::config("min_observations must be at least 2"));
        }
        if self.zero_volatility_epsilon.is_nan() || self.zero_volatility_epsilon < 0.0 {
            return Err(Error::config("zero_volatility_epsilon must be non-negative"));
        }
        if self.histogram_bins == 0 {
            return Err(Error::config("histogram_bins must be positive"));
        }
        Ok(())
    }
}
