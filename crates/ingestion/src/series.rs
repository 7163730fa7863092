//! Series construction: normalize, order, derive returns.
//!
//! A [`Series`] is built once from raw records and is read-only afterwards.

use chrono::NaiveDate;
use equity_core::{
    config::InvalidDatePolicy, CleanRecord, Config, Error, RawRecord, Result, SkippedRecord,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::fields::FieldNormalizer;

/// Simple return between two adjacent observations.
///
/// Missing when either side is missing or the previous value is zero.
#[inline]
fn simple_return(prev: Option<f64>, curr: Option<f64>) -> Option<f64> {
    let prev = prev.filter(|p| *p != 0.0)?;
    let curr = curr?;
    Some((curr - prev) / prev).filter(|r| r.is_finite())
}

/// Derive period-over-period returns.
///
/// The previous value always comes from the immediately preceding index; a
/// missing value is not bridged by an earlier one. Index 0 is always missing.
pub fn derive_returns<I>(values: I) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut prev = None;
    values
        .into_iter()
        .map(|curr| {
            let ret = simple_return(prev, curr);
            prev = curr;
            ret
        })
        .collect()
}

/// Ordered, normalized price history of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    records: Vec<CleanRecord>,
    daily_returns: Vec<Option<f64>>,
    market_returns: Vec<Option<f64>>,
    skipped: Vec<SkippedRecord>,
}

impl Series {
    /// Build a series from normalized records.
    ///
    /// Records are stable-sorted by date, so same-day records keep their
    /// relative order. Fails on empty input.
    pub fn from_records(mut records: Vec<CleanRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::empty_input("series needs at least one record"));
        }

        records.sort_by_key(|r| r.date);

        let daily_returns = derive_returns(records.iter().map(|r| r.price));
        let market_returns = derive_returns(records.iter().map(|r| r.market_index));

        Ok(Self {
            records,
            daily_returns,
            market_returns,
            skipped: Vec::new(),
        })
    }

    /// Records in ascending date order.
    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series has no records. Never true for a built series.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Daily returns aligned with [`Series::records`].
    pub fn daily_returns(&self) -> &[Option<f64>] {
        &self.daily_returns
    }

    /// Market index returns aligned with [`Series::records`].
    pub fn market_returns(&self) -> &[Option<f64>] {
        &self.market_returns
    }

    /// Whether any record carries a market index level.
    pub fn has_market_index(&self) -> bool {
        self.records.iter().any(|r| r.market_index.is_some())
    }

    /// Raw rows dropped for an invalid date.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Earliest date.
    pub fn first_date(&self) -> NaiveDate {
        self.records[0].date
    }

    /// Latest date.
    pub fn last_date(&self) -> NaiveDate {
        self.records[self.records.len() - 1].date
    }

    /// Defined daily returns, in date order.
    pub fn valid_returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.daily_returns.iter().flatten().copied()
    }

    /// Defined daily returns paired with their dates.
    pub fn dated_returns(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.records
            .iter()
            .zip(&self.daily_returns)
            .filter_map(|(record, ret)| ret.map(|r| (record.date, r)))
    }
}

/// Turns raw records into a [`Series`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    fields: FieldNormalizer,
    policy: InvalidDatePolicy,
}

impl Normalizer {
    /// Create a normalizer from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            fields: FieldNormalizer::new(&config.normalizer),
            policy: config.series.invalid_date_policy,
        }
    }

    /// Normalize, order and derive returns.
    ///
    /// With [`InvalidDatePolicy::Skip`] a record with an unresolvable date is
    /// dropped, logged and listed in [`Series::skipped`]; with
    /// [`InvalidDatePolicy::Abort`] the first one fails the call.
    pub fn normalize(&self, raw_records: Vec<RawRecord>) -> Result<Series> {
        if raw_records.is_empty() {
            return Err(Error::empty_input("no records supplied"));
        }

        let total = raw_records.len();
        let mut records = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        let skip = self.policy == InvalidDatePolicy::Skip;

        for (index, raw) in raw_records.iter().enumerate() {
            match self.fields.normalize(index, raw) {
                Ok(record) => records.push(record),
                Err(Error::InvalidDate { index, value, reason }) if skip => {
                    warn!(index, %value, %reason, "skipping record with invalid date");
                    skipped.push(SkippedRecord { index, value, reason });
                }
                Err(err) => return Err(err),
            }
        }

        if records.is_empty() {
            return Err(Error::empty_input(format!(
                "all {} records had invalid dates",
                total
            )));
        }

        let mut series = Series::from_records(records)?;
        series.skipped = skipped;

        debug!(
            records = series.len(),
            skipped = series.skipped.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            "normalized series"
        );

        Ok(series)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Normalize raw records with the default configuration.
pub fn normalize_series(raw_records: Vec<RawRecord>) -> Result<Series> {
    Normalizer::default().normalize(raw_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn raw(date: &str, price: &str) -> RawRecord {
        RawRecord::new(date, price, "0%", "1K")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_derive_returns_formula() {
        let prices = [100.0, 105.0, 99.75, 120.0, 118.8];
        let returns = derive_returns(prices.iter().map(|p| Some(*p)));

        assert_eq!(returns.len(), prices.len());
        assert_eq!(returns[0], None);
        for i in 1..prices.len() {
            let expected = (prices[i] - prices[i - 1]) / prices[i - 1];
            assert_abs_diff_eq!(returns[i].unwrap(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_missing_price_affects_two_returns_only() {
        let prices = vec![Some(100.0), Some(101.0), None, Some(103.0), Some(104.0)];
        let returns = derive_returns(prices);

        assert_eq!(returns[0], None);
        assert!(returns[1].is_some());
        assert_eq!(returns[2], None);
        // No carry-forward from index 1.
        assert_eq!(returns[3], None);
        assert!(returns[4].is_some());
    }

    #[test]
    fn test_zero_previous_price() {
        let returns = derive_returns(vec![Some(0.0), Some(5.0), Some(10.0)]);
        assert_eq!(returns, vec![None, None, Some(1.0)]);
    }

    #[test]
    fn test_sorts_ascending() {
        let series = normalize_series(vec![
            raw("2024-01-03", "121"),
            raw("2024-01-01", "100"),
            raw("2024-01-02", "110"),
        ])
        .unwrap();

        let dates: Vec<_> = series.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_abs_diff_eq!(series.daily_returns()[1].unwrap(), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(series.daily_returns()[2].unwrap(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_stable_for_equal_dates() {
        let series = normalize_series(vec![
            raw("2024-01-02", "1"),
            raw("2024-01-01", "2"),
            raw("2024-01-02", "3"),
            raw("2024-01-02", "4"),
        ])
        .unwrap();

        let prices: Vec<_> = series.records().iter().map(|r| r.price.unwrap()).collect();
        assert_eq!(prices, vec![2.0, 1.0, 3.0, 4.0]);
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn test_skip_invalid_dates() {
        let series = normalize_series(vec![
            raw("2024-01-01", "100"),
            raw("garbage", "105"),
            raw("2024-01-02", "110"),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.skipped().len(), 1);
        assert_eq!(series.skipped()[0].index, 1);
        assert_eq!(series.skipped()[0].value, "garbage");
        assert_abs_diff_eq!(series.daily_returns()[1].unwrap(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_abort_on_invalid_date() {
        let mut config = Config::default();
        config.series.invalid_date_policy = InvalidDatePolicy::Abort;
        let normalizer = Normalizer::new(&config);

        let result = normalizer.normalize(vec![raw("2024-01-01", "100"), raw("??", "105")]);

        assert!(matches!(result, Err(Error::InvalidDate { index: 1, .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(normalize_series(Vec::new()), Err(Error::EmptyInput(_))));
        assert!(matches!(
            normalize_series(vec![raw("bad", "1"), raw("worse", "2")]),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(Series::from_records(Vec::new()), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_market_returns() {
        let series = normalize_series(vec![
            raw("2024-01-01", "100").with_market_index("1,000"),
            raw("2024-01-02", "101").with_market_index("1,010"),
            raw("2024-01-03", "102"),
        ])
        .unwrap();

        assert!(series.has_market_index());
        assert_eq!(series.market_returns()[0], None);
        assert_abs_diff_eq!(series.market_returns()[1].unwrap(), 0.01, epsilon = 1e-12);
        assert_eq!(series.market_returns()[2], None);
    }

    #[test]
    fn test_dated_returns_skip_missing() {
        let series = normalize_series(vec![
            raw("2024-01-01", "100"),
            raw("2024-01-02", "n/a"),
            raw("2024-01-03", "102"),
            raw("2024-01-04", "104.04"),
        ])
        .unwrap();

        let dated: Vec<_> = series.dated_returns().collect();
        assert_eq!(dated.len(), 1);
        assert_eq!(dated[0].0, date(2024, 1, 4));
        assert_abs_diff_eq!(dated[0].1, 0.02, epsilon = 1e-9);
        assert_eq!(series.valid_returns().count(), 1);
        assert_eq!(series.first_date(), date(2024, 1, 1));
        assert_eq!(series.last_date(), date(2024, 1, 4));
    }

    #[test]
    fn test_series_serializes_to_json() {
        let series = normalize_series(vec![
            raw("2024-01-01", "100"),
            raw("bad", "1"),
            raw("2024-01-02", "110"),
        ])
        .unwrap();

        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(json["records"].as_array().unwrap().len(), 2);
        assert_eq!(json["records"][0]["date"], "2024-01-01");
        assert!(json["daily_returns"][0].is_null());
        let ret = json["daily_returns"][1].as_f64().unwrap();
        assert_abs_diff_eq!(ret, 0.1, epsilon = 1e-9);
        assert_eq!(json["skipped"][0]["index"], 1);
    }
}
