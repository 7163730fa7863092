//! High-activity day ranking.

use std::cmp::Reverse;

use equity_core::{CleanRecord, Error, Result};
use equity_ingestion::Series;
use ordered_float::OrderedFloat;

/// The `n` records with the largest volume, in descending volume order.
///
/// Records with a missing volume are not ranked. Equal volumes keep series
/// order, so the earlier date comes first. Asking for more records than are
/// ranked returns all of them.
pub fn top_n_by_volume(series: &Series, n: usize) -> Result<Vec<CleanRecord>> {
    if n == 0 {
        return Err(Error::invalid_argument("top_n_by_volume requires n > 0"));
    }

    let mut ranked: Vec<(&CleanRecord, f64)> = series
        .records()
        .iter()
        .filter_map(|r| r.volume.map(|v| (r, v)))
        .collect();

    // sort_by_key is stable.
    ranked.sort_by_key(|&(_, volume)| Reverse(OrderedFloat(volume)));

    Ok(ranked
        .into_iter()
        .take(n)
        .map(|(record, _)| record.clone())
        .collect())
}
