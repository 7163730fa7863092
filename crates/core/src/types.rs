//! Core data types for the equity returns pipeline.
//!
//! Every numeric value that may be absent is an `Option<f64>`; `None` is the
//! missing marker and no NaN is ever stored in these types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date column of a raw record: already a calendar date, or text to be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Date resolved by the source.
    Parsed(NaiveDate),
    /// Unparsed date text.
    Text(String),
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::Parsed(date) => write!(f, "{}", date),
            RawDate::Text(text) => f.write_str(text),
        }
    }
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Parsed(date)
    }
}

impl From<String> for RawDate {
    fn from(text: String) -> Self {
        RawDate::Text(text)
    }
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}

/// One observation for one instrument on one date, as ingested.
///
/// Field aliases match the usual price-history export headers
/// (`Date`, `Price`, `Change %`, `Vol.`), so a tabular reader can
/// deserialize rows straight into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Calendar date or date text.
    #[serde(alias = "Date")]
    pub date: RawDate,
    /// Price text, possibly with thousands separators.
    #[serde(alias = "Price", default)]
    pub price: String,
    /// Day change as percent text, e.g. "-1.25%".
    #[serde(alias = "Change %", alias = "change_pct", default)]
    pub change_percent: String,
    /// Volume text with an optional K/M/B suffix.
    #[serde(alias = "Vol.", alias = "Volume", default)]
    pub volume: String,
    /// Optional benchmark index level on the same date.
    #[serde(alias = "Market_Index", default)]
    pub market_index: Option<String>,
}

impl RawRecord {
    /// Create a raw record without a market index column.
    pub fn new(
        date: impl Into<RawDate>,
        price: impl Into<String>,
        change_percent: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
            change_percent: change_percent.into(),
            volume: volume.into(),
            market_index: None,
        }
    }

    /// Attach a market index level.
    pub fn with_market_index(mut self, level: impl Into<String>) -> Self {
        self.market_index = Some(level.into());
        self
    }
}

/// Normalized form of a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Closing price in currency units.
    pub price: Option<f64>,
    /// Day change as a decimal fraction (2.5% is 0.025).
    pub change_fraction: Option<f64>,
    /// Traded volume, expanded from K/M/B notation.
    pub volume: Option<f64>,
    /// Benchmark index level.
    pub market_index: Option<f64>,
}

/// A raw row dropped because its date could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the caller's input.
    pub index: usize,
    /// Raw date as supplied.
    pub value: String,
    /// Parse failure description.
    pub reason: String,
}

/// Per-instrument aggregate over the defined daily returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Mean of the defined daily returns.
    pub mean_daily_return: Option<f64>,
    /// Sample standard deviation (n - 1) of the defined daily returns.
    pub volatility: Option<f64>,
    /// (last price - first price) / first price.
    pub total_growth: Option<f64>,
    /// mean / volatility, risk-free rate zero. Missing when volatility is zero.
    pub sharpe_ratio: Option<f64>,
    /// Number of defined daily returns.
    pub observations: usize,
}

/// One cell of a [`CorrelationMatrix`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCell {
    /// Pearson coefficient, missing with fewer than two joined points.
    pub coefficient: Option<f64>,
    /// Number of dates the coefficient was computed over.
    pub observations: usize,
}

/// Symmetric matrix of return correlations between instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    instruments: Vec<String>,
    cells: Vec<CorrelationCell>,
}

impl CorrelationMatrix {
    /// Build a matrix by evaluating `cell(i, j)` for each `i <= j` and mirroring it.
    pub fn from_upper_triangle<F>(instruments: Vec<String>, mut cell: F) -> Self
    where
        F: FnMut(usize, usize) -> CorrelationCell,
    {
        let n = instruments.len();
        let mut cells = vec![CorrelationCell::default(); n * n];
        for i in 0..n {
            for j in i..n {
                let value = cell(i, j);
                cells[i * n + j] = value;
                cells[j * n + i] = value;
            }
        }
        Self { instruments, cells }
    }

    /// Instrument names, in row/column order.
    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether the matrix has no instruments.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.instruments.iter().position(|n| n == name)
    }

    /// Cell for a pair, `None` if either instrument is unknown.
    pub fn cell(&self, a: &str, b: &str) -> Option<&CorrelationCell> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.cells.get(i * self.len() + j)
    }

    /// Coefficient for a pair; `None` if unknown or missing.
    pub fn coefficient(&self, a: &str, b: &str) -> Option<f64> {
        self.cell(a, b).and_then(|c| c.coefficient)
    }
}

/// Equal-width histogram of daily returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Number of returns per bin.
    pub counts: Vec<usize>,
}

impl ReturnHistogram {
    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of counted returns.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
