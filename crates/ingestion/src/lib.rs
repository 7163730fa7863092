//! Data ingestion and normalization for the equity returns pipeline.
//!
//! This crate handles:
//! - Price, percent and volume text parsing
//! - Date resolution
//! - Chronological ordering and daily return derivation

pub mod dates;
pub mod fields;
pub mod series;

pub use fields::{parse_percent, parse_price, parse_volume, FieldNormalizer};
pub use series::{normalize_series, Normalizer, Series};
