//! Metrics for the equity returns pipeline.
//!
//! This crate handles:
//! - Mean return, volatility, growth and Sharpe ratio per instrument
//! - Highest-volume day ranking
//! - Cross-instrument and market index return correlation
//! - Return distribution histograms
//! - Parallel per-instrument batch processing
//!
//! The free functions use the default metrics configuration; build a
//! [`MetricsEngine`] to change it.

pub mod activity;
pub mod batch;
pub mod correlation;
pub mod distribution;
pub mod engine;
pub mod stats;
pub mod summary;

use std::collections::BTreeMap;

use equity_core::{config::MetricsConfig, CorrelationMatrix, MetricsSummary, ReturnHistogram};

pub use activity::top_n_by_volume;
pub use batch::{normalize_all, summarize_all};
pub use engine::MetricsEngine;
pub use equity_ingestion::{normalize_series, Series};

/// Summarize one series with the default configuration.
pub fn summarize(series: &Series) -> MetricsSummary {
    summary::summarize_with(series, &MetricsConfig::default())
}

/// Correlate daily returns across instruments with the default configuration.
pub fn correlate(series_by_name: &BTreeMap<String, Series>) -> CorrelationMatrix {
    correlation::correlate_with(series_by_name, &MetricsConfig::default())
}

/// Correlate daily returns with the market index column.
pub fn index_correlation(series: &Series) -> Option<f64> {
    correlation::index_correlation_with(series, &MetricsConfig::default())
}

/// Return histogram with the default bin count.
pub fn return_histogram(series: &Series) -> Option<ReturnHistogram> {
    distribution::return_histogram(series, MetricsConfig::default().histogram_bins)
}
