//! Per-instrument work across many instruments.
//!
//! Instruments are independent of each other, so normalization and
//! summaries run on the rayon pool. Output is keyed by name and identical to
//! processing the instruments one by one.

use std::collections::BTreeMap;

use equity_core::{MetricsSummary, RawRecord, Result};
use equity_ingestion::{Normalizer, Series};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::engine::MetricsEngine;

/// Normalize every instrument's raw records.
///
/// A failing instrument does not affect the others; its error is kept under
/// its name for the caller to decide on.
pub fn normalize_all(
    normalizer: &Normalizer,
    raw_by_name: BTreeMap<String, Vec<RawRecord>>,
) -> BTreeMap<String, Result<Series>> {
    let results: BTreeMap<String, Result<Series>> = raw_by_name
        .into_par_iter()
        .map(|(name, raw)| {
            let result = normalizer.normalize(raw);
            if let Err(err) = &result {
                warn!(instrument = %name, error = %err, "failed to normalize instrument");
            }
            (name, result)
        })
        .collect();

    let failed = results.values().filter(|r| r.is_err()).count();
    info!(
        instruments = results.len(),
        failed,
        "normalized instruments"
    );

    results
}

/// Summarize every series.
pub fn summarize_all(
    engine: &MetricsEngine,
    series_by_name: &BTreeMap<String, Series>,
) -> BTreeMap<String, MetricsSummary> {
    series_by_name
        .par_iter()
        .map(|(name, series)| (name.clone(), engine.summarize(series)))
        .collect()
}
