//! Market index series with the two regime inputs: 200-day moving average
//! and Wilder RSI(14) over the index close.

use chrono::NaiveDate;

use crate::indicators::{rolling_mean, wilder_rsi};

/// The benchmark index history used for regime gating.
///
/// `ma` and `rsi` are aligned with `dates`/`close`; entries are NaN until
/// their warmup windows fill.
#[derive(Debug, Clone)]
pub struct MarketSeries {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub ma: Vec<f64>,
    pub rsi: Vec<f64>,
}

impl MarketSeries {
    /// Build the index series from date-sorted closes, deriving MA(200) and
    /// RSI(14).
    pub fn new(mut rows: Vec<(NaiveDate, f64)>) -> Self {
        rows.sort_by_key(|&(d, _)| d);
        let dates: Vec<NaiveDate> = rows.iter().map(|&(d, _)| d).collect();
        let close: Vec<f64> = rows.iter().map(|&(_, c)| c).collect();
        let ma = rolling_mean(&close, 200);
        let rsi = wilder_rsi(&close, 14);
        Self {
            dates,
            close,
            ma,
            rsi,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of the latest bar on or before `date`, or None before the
    /// first bar. Evaluators use this as the point-in-time anchor.
    pub fn at_or_before(&self, date: NaiveDate) -> Option<usize> {
        let end = self.dates.partition_point(|&d| d <= date);
        end.checked_sub(1)
    }
}
