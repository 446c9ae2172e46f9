//! Data layer: per-security indicator series, the market index series, the
//! ranked universe, and the run-scoped indicator store.
//!
//! The store is an explicit cache object constructed once per run and passed
//! into the engine and the signal evaluators. Nothing here is process-global:
//! two differently configured runs never share cached series.

mod market;
mod series;
mod store;
mod universe;

pub use market::MarketSeries;
pub use series::{IndicatorSeries, RawBar};
pub use store::IndicatorStore;
pub use universe::{normalize_security, Universe};

use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for data loading.
///
/// Per-security errors are downgraded to "no data" by the store (the engine
/// treats that as no-signal); universe and market-index errors are fatal and
/// abort before the day loop starts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: String, column: String },

    #[error("{path}: unparseable date '{value}'")]
    BadDate { path: String, value: String },

    #[error("{path}: no usable rows")]
    Empty { path: String },
}

/// Parse a date cell: `YYYY-MM-DD`, optionally with a time suffix.
pub(crate) fn parse_date_cell(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    // Timestamped exports ("2024-01-02 00:00:00"): keep the date part.
    let date_part = value.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
