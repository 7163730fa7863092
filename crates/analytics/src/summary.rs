//! Per-instrument return metrics.
//!
//! Mean, volatility and Sharpe ratio are computed over the defined daily
//! returns only; missing returns are excluded, never counted as zero.

use equity_core::{config::MetricsConfig, MetricsSummary};
use equity_ingestion::Series;
use tracing::debug;

use crate::stats;

/// (last price - first price) / first price.
///
/// Uses the first and last records of the ordered series, so a missing price
/// at either end makes the growth missing even when inner prices exist.
pub fn total_growth(series: &Series) -> Option<f64> {
    let first = series.records().first()?.price.filter(|p| *p != 0.0)?;
    let last = series.records().last()?.price?;
    Some((last - first) / first).filter(|g| g.is_finite())
}

/// Summarize a series under the given metrics configuration.
pub fn summarize_with(series: &Series, config: &MetricsConfig) -> MetricsSummary {
    let returns: Vec<f64> = series.valid_returns().collect();

    let mean_daily_return = stats::mean(&returns);
    let volatility = stats::sample_std_dev(&returns, config.min_observations);

    // Zero volatility leaves the ratio undefined.
    let zero_epsilon = config.zero_volatility_epsilon.max(0.0);
    let sharpe_ratio = match (mean_daily_return, volatility) {
        (Some(mean), Some(vol)) if vol > zero_epsilon => Some(mean / vol),
        _ => None,
    }
    .filter(|s| s.is_finite());

    let summary = MetricsSummary {
        mean_daily_return,
        volatility,
        total_growth: total_growth(series),
        sharpe_ratio,
        observations: returns.len(),
    };

    debug!(
        observations = summary.observations,
        mean = ?summary.mean_daily_return,
        volatility = ?summary.volatility,
        sharpe = ?summary.sharpe_ratio,
        "summarized series"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use equity_core::CleanRecord;

    fn series(prices: &[Option<f64>]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = prices
            .iter()
            .enumerate()
            .map(|(i, price)| CleanRecord {
                date: start + chrono::Days::new(i as u64),
                price: *price,
                change_fraction: None,
                volume: None,
                market_index: None,
            })
            .collect();
        Series::from_records(records).unwrap()
    }

    #[test]
    fn test_basic_summary() {
        // Returns: +10%, -10%, +5%
        let s = series(&[Some(100.0), Some(110.0), Some(99.0), Some(103.95)]);
        let summary = summarize_with(&s, &MetricsConfig::default());

        let returns = [0.1, -0.1, 0.05];
        let mean = returns.iter().sum::<f64>() / 3.0;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 2.0;

        assert_eq!(summary.observations, 3);
        assert_abs_diff_eq!(summary.mean_daily_return.unwrap(), mean, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.volatility.unwrap(), var.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(summary.sharpe_ratio.unwrap(), mean / var.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(summary.total_growth.unwrap(), 0.0395, epsilon = 1e-9);
    }

    #[test]
    fn test_single_return() {
        let s = series(&[Some(100.0), Some(101.0)]);
        let summary = summarize_with(&s, &MetricsConfig::default());

        assert_eq!(summary.observations, 1);
        assert_abs_diff_eq!(summary.mean_daily_return.unwrap(), 0.01, epsilon = 1e-12);
        assert_eq!(summary.volatility, None);
        assert_eq!(summary.sharpe_ratio, None);
    }

    #[test]
    fn test_no_returns() {
        let s = series(&[Some(100.0)]);
        let summary = summarize_with(&s, &MetricsConfig::default());

        assert_eq!(summary.observations, 0);
        assert_eq!(summary.mean_daily_return, None);
        assert_eq!(summary.volatility, None);
        assert_eq!(summary.sharpe_ratio, None);
        assert_eq!(summary.total_growth, Some(0.0));
    }

    #[test]
    fn test_missing_returns_are_excluded() {
        // Returns: None, +10%, None, None, +10%
        let s = series(&[Some(100.0), Some(110.0), None, Some(50.0), Some(55.0)]);
        let summary = summarize_with(&s, &MetricsConfig::default());

        assert_eq!(summary.observations, 2);
        assert_abs_diff_eq!(summary.mean_daily_return.unwrap(), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.volatility.unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(summary.sharpe_ratio, None);
    }

    #[test]
    fn test_total_growth_needs_both_ends() {
        assert_eq!(total_growth(&series(&[None, Some(1.0), Some(2.0)])), None);
        assert_eq!(total_growth(&series(&[Some(1.0), Some(2.0), None])), None);
        assert_eq!(total_growth(&series(&[Some(0.0), Some(2.0)])), None);
        assert_abs_diff_eq!(
            total_growth(&series(&[Some(50.0), None, Some(75.0)])).unwrap(),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_min_observations_raises_threshold() {
        let s = series(&[Some(100.0), Some(101.0), Some(103.0)]);
        let config = MetricsConfig {
            min_observations: 3,
            ..MetricsConfig::default()
        };
        let summary = summarize_with(&s, &config);

        assert_eq!(summary.observations, 2);
        assert!(summary.mean_daily_return.is_some());
        assert_eq!(summary.volatility, None);
        assert_eq!(summary.sharpe_ratio, None);
    }

    #[test]
    fn test_flat_prices_with_negative_epsilon() {
        let s = series(&[Some(100.0), Some(100.0), Some(100.0)]);
        let config = MetricsConfig {
            zero_volatility_epsilon: -1.0,
            ..MetricsConfig::default()
        };
        let summary = summarize_with(&s, &config);

        assert_eq!(summary.volatility, Some(0.0));
        assert_eq!(summary.sharpe_ratio, None);
    }
}
