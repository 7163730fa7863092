//! Textual field normalization.
//!
//! Converts price, percent and volume text into numbers. Nothing here fails
//! loudly: text that does not hold a finite number becomes `None`.

use equity_core::{config::NormalizerConfig, CleanRecord, RawRecord, Result};

use crate::dates::resolve_date;

/// Volume magnitude markers, in the order they are checked.
///
/// The first marker contained anywhere in the text governs, so `"1MK"` is
/// treated as millions (and then fails to parse), never as thousands.
const VOLUME_SUFFIXES: [(char, f64); 3] = [('M', 1e6), ('K', 1e3), ('B', 1e9)];

/// Parse a plain decimal number, rejecting NaN and infinities.
fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a price, stripping `,` thousands separators.
pub fn parse_price(text: &str) -> Option<f64> {
    parse_price_with(text, ',')
}

/// Parse a price, stripping every occurrence of `separator`.
pub fn parse_price_with(text: &str, separator: char) -> Option<f64> {
    parse_number(&text.trim().replace(separator, ""))
}

/// Parse a percent string into a fraction: `"2.5%"` is `0.025`.
///
/// The trailing `%` is optional.
pub fn parse_percent(text: &str) -> Option<f64> {
    let text = text.trim();
    let digits = text.strip_suffix('%').unwrap_or(text);
    parse_number(digits).map(|v| v / 100.0)
}

/// Parse a volume that may carry a K/M/B magnitude suffix.
pub fn parse_volume(text: &str) -> Option<f64> {
    let text = text.trim();
    match VOLUME_SUFFIXES
        .iter()
        .find(|(marker, _)| text.contains(*marker))
    {
        Some(&(marker, multiplier)) => {
            parse_number(&text.replace(marker, "")).map(|v| v * multiplier)
        }
        None => parse_number(text),
    }
}

/// Applies the field parsers to whole records.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    thousands_separator: char,
    date_formats: Vec<String>,
}

impl FieldNormalizer {
    /// Create a normalizer from configuration.
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            thousands_separator: config.thousands_separator,
            date_formats: config.date_formats.clone(),
        }
    }

    /// Normalize one record. `index` is its position in the caller's input and
    /// only used for error reporting.
    ///
    /// Fails only when the date cannot be resolved.
    pub fn normalize(&self, index: usize, record: &RawRecord) -> Result<CleanRecord> {
        let date = resolve_date(index, &record.date, &self.date_formats)?;

        Ok(CleanRecord {
            date,
            price: parse_price_with(&record.price, self.thousands_separator),
            change_fraction: parse_percent(&record.change_percent),
            volume: parse_volume(&record.volume),
            market_index: record
                .market_index
                .as_deref()
                .and_then(|level| parse_price_with(level, self.thousands_separator)),
        })
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}
