//! Return correlation across instruments and against a market index.
//!
//! Correlating is the only step that needs every series at once; each
//! instrument is reduced to a date-keyed return map first.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use equity_core::{
    config::{CorrelationJoin, MetricsConfig},
    CorrelationCell, CorrelationMatrix,
};
use equity_ingestion::Series;
use tracing::trace;

use crate::stats;

/// Defined daily returns keyed by date.
///
/// With duplicate dates the last record of the day (in series order) wins.
fn returns_by_date(series: &Series) -> BTreeMap<NaiveDate, f64> {
    series.dated_returns().collect()
}

/// Dates on which every map has a return.
fn common_dates(maps: &[BTreeMap<NaiveDate, f64>]) -> BTreeSet<NaiveDate> {
    let Some((first, rest)) = maps.split_first() else {
        return BTreeSet::new();
    };
    first
        .keys()
        .filter(|date| rest.iter().all(|m| m.contains_key(*date)))
        .copied()
        .collect()
}

/// Paired samples of two return maps.
///
/// With `dates` given only those dates are used, otherwise every date both
/// maps share.
fn aligned(
    a: &BTreeMap<NaiveDate, f64>,
    b: &BTreeMap<NaiveDate, f64>,
    dates: Option<&BTreeSet<NaiveDate>>,
) -> (Vec<f64>, Vec<f64>) {
    let pair = |date: &NaiveDate| Some((*a.get(date)?, *b.get(date)?));
    match dates {
        Some(dates) => dates.iter().filter_map(pair).unzip(),
        None => a.keys().filter_map(pair).unzip(),
    }
}

/// Pearson correlation matrix of daily returns, keyed by instrument name.
///
/// Each unordered pair is computed once. A diagonal cell is exactly 1.0 when
/// the instrument has at least `min_observations` defined returns.
pub fn correlate_with(
    series_by_name: &BTreeMap<String, Series>,
    config: &MetricsConfig,
) -> CorrelationMatrix {
    let names: Vec<String> = series_by_name.keys().cloned().collect();
    let returns: Vec<BTreeMap<NaiveDate, f64>> =
        series_by_name.values().map(returns_by_date).collect();

    let common = match config.correlation_join {
        CorrelationJoin::AllInstruments => Some(common_dates(&returns)),
        CorrelationJoin::Pairwise => None,
    };

    CorrelationMatrix::from_upper_triangle(names.clone(), |i, j| {
        if i == j {
            let observations = returns[i].len();
            return CorrelationCell {
                coefficient: (observations >= config.min_observations.max(2)).then_some(1.0),
                observations,
            };
        }

        let (xs, ys) = aligned(&returns[i], &returns[j], common.as_ref());
        let coefficient = stats::pearson(
            &xs,
            &ys,
            config.min_observations,
            config.zero_volatility_epsilon,
        );

        trace!(
            a = %names[i],
            b = %names[j],
            observations = xs.len(),
            coefficient = ?coefficient,
            "correlated pair"
        );

        CorrelationCell {
            coefficient,
            observations: xs.len(),
        }
    })
}

/// Correlation between an instrument's daily returns and its market index
/// returns, over the records where both are defined.
pub fn index_correlation_with(series: &Series, config: &MetricsConfig) -> Option<f64> {
    if !series.has_market_index() {
        return None;
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = series
        .daily_returns()
        .iter()
        .zip(series.market_returns())
        .filter_map(|(r, m)| Some(((*r)?, (*m)?)))
        .unzip();

    stats::pearson(
        &xs,
        &ys,
        config.min_observations,
        config.zero_volatility_epsilon,
    )
}
