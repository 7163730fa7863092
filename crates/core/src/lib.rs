//! Core types and configuration for the equity returns pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Raw and normalized daily price records
//! - Metrics, correlation and histogram outputs
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
