//! Per-security indicator series — bars plus derived indicator columns.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::indicators::{bollinger_bands, ema, macd};

/// Raw daily bar as parsed from a security's CSV (before sorting/derivation).
///
/// Price cells may be NaN: a bar with NaN open is untradable and is skipped
/// by fill search; a bar with NaN close contributes no mark price.
#[derive(Debug, Clone)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A security's full history with precomputed indicator columns.
///
/// Bars are date-sorted ascending. The indicator columns are fixed by the
/// signal set: `ema_50`, `ema_100`, `ema_200`, `macd`, `macd_signal`,
/// `macd_histogram`, `sma_20`, `bb_upper_20`, `bb_lower_20`.
///
/// Point-in-time safety is the caller's contract: evaluators obtain a prefix
/// length via [`IndicatorSeries::len_upto`] and only index below it.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub security: String,
    pub dates: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl IndicatorSeries {
    /// Build a series from raw bars: sort by date, then derive the indicator
    /// columns over the close series.
    pub fn from_bars(security: impl Into<String>, mut bars: Vec<RawBar>) -> Self {
        bars.sort_by_key(|b| b.date);

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        let open: Vec<f64> = bars.iter().map(|b| b.open).collect();
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volume: Vec<u64> = bars.iter().map(|b| b.volume).collect();

        let mut columns = BTreeMap::new();
        for span in [50usize, 100, 200] {
            columns.insert(format!("ema_{span}"), ema(&close, span));
        }
        let m = macd(&close, 12, 26, 9);
        columns.insert("macd".into(), m.macd);
        columns.insert("macd_signal".into(), m.signal);
        columns.insert("macd_histogram".into(), m.histogram);
        let bands = bollinger_bands(&close, 20, 2.0);
        columns.insert("sma_20".into(), bands.middle);
        columns.insert("bb_upper_20".into(), bands.upper);
        columns.insert("bb_lower_20".into(), bands.lower);

        Self {
            security: security.into(),
            dates,
            open,
            high,
            low,
            close,
            volume,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Full derived column by name, or None for an unknown key.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Number of bars with date ≤ `date` — the point-in-time prefix length.
    pub fn len_upto(&self, date: NaiveDate) -> usize {
        self.dates.partition_point(|&d| d <= date)
    }

    /// First tradable bar strictly after `after`: the earliest bar whose
    /// date is greater than `after` with a non-NaN open.
    pub fn next_tradable(&self, after: NaiveDate) -> Option<(NaiveDate, f64)> {
        let start = self.dates.partition_point(|&d| d <= after);
        for i in start..self.len() {
            if !self.open[i].is_nan() {
                return Some((self.dates[i], self.open[i]));
            }
        }
        None
    }

    /// Most recent non-NaN close on or before `date`.
    pub fn latest_close_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        let end = self.len_upto(date);
        self.close[..end]
            .iter()
            .rev()
            .copied()
            .find(|c| !c.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    pub(crate) fn bar(date: NaiveDate, open: f64, close: f64) -> RawBar {
        RawBar {
            date,
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume: 1000,
        }
    }

    fn sample_series() -> IndicatorSeries {
        IndicatorSeries::from_bars(
            "00001",
            vec![
                bar(d(2024, 1, 2), 10.0, 10.5),
                bar(d(2024, 1, 3), 10.5, 11.0),
                bar(d(2024, 1, 5), 11.0, 10.8),
            ],
        )
    }

    #[test]
    fn sorts_bars_by_date() {
        let series = IndicatorSeries::from_bars(
            "00001",
            vec![
                bar(d(2024, 1, 5), 11.0, 10.8),
                bar(d(2024, 1, 2), 10.0, 10.5),
            ],
        );
        assert_eq!(series.dates, vec![d(2024, 1, 2), d(2024, 1, 5)]);
    }

    #[test]
    fn len_upto_is_point_in_time_prefix() {
        let series = sample_series();
        assert_eq!(series.len_upto(d(2024, 1, 1)), 0);
        assert_eq!(series.len_upto(d(2024, 1, 3)), 2);
        // Gap day: prefix stays at the last bar on/before it.
        assert_eq!(series.len_upto(d(2024, 1, 4)), 2);
        assert_eq!(series.len_upto(d(2024, 12, 31)), 3);
    }

    #[test]
    fn next_tradable_is_strictly_after() {
        let series = sample_series();
        assert_eq!(series.next_tradable(d(2024, 1, 2)), Some((d(2024, 1, 3), 10.5)));
        // The request-date bar itself never fills the order.
        assert_eq!(series.next_tradable(d(2024, 1, 3)), Some((d(2024, 1, 5), 11.0)));
        assert_eq!(series.next_tradable(d(2024, 1, 5)), None);
    }

    #[test]
    fn next_tradable_skips_nan_open() {
        let mut bars = vec![
            bar(d(2024, 1, 2), 10.0, 10.5),
            bar(d(2024, 1, 3), f64::NAN, 11.0),
            bar(d(2024, 1, 4), 11.2, 11.4),
        ];
        bars[1].open = f64::NAN;
        let series = IndicatorSeries::from_bars("00001", bars);
        assert_eq!(series.next_tradable(d(2024, 1, 2)), Some((d(2024, 1, 4), 11.2)));
    }

    #[test]
    fn latest_close_walks_back_over_nan() {
        let mut bars = vec![
            bar(d(2024, 1, 2), 10.0, 10.5),
            bar(d(2024, 1, 3), 10.5, f64::NAN),
        ];
        bars[1].close = f64::NAN;
        let series = IndicatorSeries::from_bars("00001", bars);
        assert_eq!(series.latest_close_on_or_before(d(2024, 1, 3)), Some(10.5));
        assert_eq!(series.latest_close_on_or_before(d(2024, 1, 1)), None);
    }

    #[test]
    fn derived_columns_present() {
        let series = sample_series();
        for key in [
            "ema_50",
            "ema_100",
            "ema_200",
            "macd",
            "macd_signal",
            "macd_histogram",
            "sma_20",
            "bb_upper_20",
            "bb_lower_20",
        ] {
            let col = series.column(key).unwrap();
            assert_eq!(col.len(), series.len(), "column {key}");
        }
        assert!(series.column("unknown").is_none());
    }
}
