//! Metrics engine.
//!
//! Combines all metric components behind one configured interface.

use std::collections::BTreeMap;

use equity_core::{
    config::MetricsConfig, CleanRecord, Config, CorrelationMatrix, MetricsSummary, ReturnHistogram,
    Result,
};
use equity_ingestion::Series;

use crate::{activity, correlation, distribution, summary};

/// Configured entry point for every per-instrument and cross-instrument metric.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create an engine from the metrics section of a configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_metrics(config.metrics.clone())
    }

    /// Create an engine from a metrics configuration.
    pub fn with_metrics(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Mean return, volatility, growth and Sharpe ratio of one series.
    pub fn summarize(&self, series: &Series) -> MetricsSummary {
        summary::summarize_with(series, &self.config)
    }

    /// Highest-volume records of one series.
    pub fn top_n_by_volume(&self, series: &Series, n: usize) -> Result<Vec<CleanRecord>> {
        activity::top_n_by_volume(series, n)
    }

    /// Return correlation matrix across instruments.
    pub fn correlate(&self, series_by_name: &BTreeMap<String, Series>) -> CorrelationMatrix {
        correlation::correlate_with(series_by_name, &self.config)
    }

    /// Correlation of one instrument against its market index column.
    pub fn index_correlation(&self, series: &Series) -> Option<f64> {
        correlation::index_correlation_with(series, &self.config)
    }

    /// Return histogram with the configured bin count.
    pub fn return_histogram(&self, series: &Series) -> Option<ReturnHistogram> {
        distribution::return_histogram(series, self.config.histogram_bins)
    }
}
