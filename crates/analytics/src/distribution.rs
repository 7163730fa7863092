//! Daily return distribution.

use equity_core::ReturnHistogram;
use equity_ingestion::Series;

/// Equal-width histogram of the defined daily returns.
///
/// Bins span [min, max] of the returns; the last bin is closed on the right.
/// When every return is equal the span is widened to value ± 0.5. `None`
/// when there are no returns or `bins` is zero.
pub fn return_histogram(series: &Series, bins: usize) -> Option<ReturnHistogram> {
    if bins == 0 {
        return None;
    }

    let returns: Vec<f64> = series.valid_returns().collect();
    if returns.is_empty() {
        return None;
    }

    let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
    let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..=bins).map(|k| lo + width * k as f64).collect();
    edges[bins] = hi;

    let mut counts = vec![0usize; bins];
    for r in returns {
        let idx = (((r - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(ReturnHistogram { edges, counts })
}
